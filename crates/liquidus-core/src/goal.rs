//! The user's intake goal and the settings that accompany it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, units::Units};

/// A validated daily intake goal, expressed in the store's current units.
///
/// The weekly goal is always derived from the daily one and never stored, so
/// changing the daily goal immediately changes every weekly computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGoal")]
pub struct GoalConfig {
  daily_goal: f64,
}

#[derive(Deserialize)]
struct RawGoal {
  daily_goal: f64,
}

impl TryFrom<RawGoal> for GoalConfig {
  type Error = Error;

  fn try_from(raw: RawGoal) -> Result<Self> { Self::new(raw.daily_goal) }
}

impl GoalConfig {
  /// Rejects zero, negative and non-finite goals.
  pub fn new(daily_goal: f64) -> Result<Self> {
    if daily_goal.is_finite() && daily_goal > 0.0 {
      Ok(Self { daily_goal })
    } else {
      Err(Error::InvalidGoal(daily_goal))
    }
  }

  pub fn daily_goal(&self) -> f64 { self.daily_goal }

  pub fn weekly_goal(&self) -> f64 { self.daily_goal * 7.0 }

  /// The same goal re-expressed in `to`, assuming it is currently in `from`.
  pub fn convert(&self, from: Units, to: Units) -> Result<Self> {
    Self::new(from.convert(self.daily_goal, to))
  }
}

/// Persisted per-user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
  pub goal:             GoalConfig,
  pub units:            Units,
  /// When samples were last imported from an external health store.
  pub last_health_sync: Option<DateTime<Utc>>,
}
