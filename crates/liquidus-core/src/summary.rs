//! Precomputed day/week summaries for widgets and shortcut integrations.

use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  aggregate::IntakeAggregator,
  calendar::{DayKey, WeekRange},
  goal::GoalConfig,
  units::Units,
};

/// Which kind of period a summary covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
  Daily,
  Weekly,
}

/// Intake of a single type within the summarised period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBreakdown {
  pub type_id: Uuid,
  pub name:    String,
  pub amount:  f64,
  /// Share of the period's goal, as a fraction.
  pub percent: f64,
}

/// Everything a progress view needs for one day or one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSummary {
  pub period:        TimePeriod,
  pub start:         DayKey,
  /// Equal to `start` for daily summaries.
  pub end:           DayKey,
  pub units:         Units,
  /// The goal for the whole period (daily goal, or daily goal × 7).
  pub goal:          f64,
  pub total_amount:  f64,
  pub total_percent: f64,
  /// One entry per enabled type in registry order, zero amounts included.
  pub breakdown:     Vec<TypeBreakdown>,
}

impl IntakeSummary {
  /// A summary with no recorded intake, used when the reference date could
  /// not be resolved.
  pub fn empty(
    period: TimePeriod,
    start: DayKey,
    end: DayKey,
    goal: &GoalConfig,
    units: Units,
  ) -> Self {
    let goal = match period {
      TimePeriod::Daily => goal.daily_goal(),
      TimePeriod::Weekly => goal.weekly_goal(),
    };
    Self {
      period,
      start,
      end,
      units,
      goal,
      total_amount: 0.0,
      total_percent: 0.0,
      breakdown: Vec::new(),
    }
  }

  /// Whether the goal for the period has been reached.
  pub fn goal_met(&self) -> bool { self.total_percent >= 1.0 }
}

impl<Tz: TimeZone> IntakeAggregator<'_, Tz> {
  /// Summarise `day` against the daily goal.
  pub fn day_summary(
    &self,
    day: DayKey,
    goal: &GoalConfig,
    units: Units,
  ) -> IntakeSummary {
    let breakdown = self
      .enabled_types()
      .map(|t| TypeBreakdown {
        type_id: t.type_id,
        name:    t.name.clone(),
        amount:  self.type_amount_by_day(t.type_id, day),
        percent: self.type_percent_by_day(t.type_id, day, goal),
      })
      .collect();

    IntakeSummary {
      period: TimePeriod::Daily,
      start: day,
      end: day,
      units,
      goal: goal.daily_goal(),
      total_amount: self.total_amount_by_day(day),
      total_percent: self.total_percent_by_day(day, goal),
      breakdown,
    }
  }

  /// Summarise the Sunday–Saturday week containing `day` against the weekly
  /// goal.
  pub fn week_summary(
    &self,
    day: DayKey,
    goal: &GoalConfig,
    units: Units,
  ) -> IntakeSummary {
    let week = WeekRange::containing(day);
    let breakdown = self
      .enabled_types()
      .map(|t| TypeBreakdown {
        type_id: t.type_id,
        name:    t.name.clone(),
        amount:  self.type_amount_by_week(t.type_id, &week),
        percent: self.type_percent_by_week(t.type_id, &week, goal),
      })
      .collect();

    IntakeSummary {
      period: TimePeriod::Weekly,
      start: week.start,
      end: week.end,
      units,
      goal: goal.weekly_goal(),
      total_amount: self.total_amount_by_week(&week),
      total_percent: self.total_percent_by_week(&week, goal),
      breakdown,
    }
  }
}
