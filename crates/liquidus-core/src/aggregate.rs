//! Day- and week-bucketed intake aggregation.
//!
//! [`IntakeAggregator`] borrows a snapshot of the record collection, the type
//! registry and the local time zone. Every operation is a pure function of
//! those inputs plus its arguments: nothing is cached between calls and the
//! inputs are never modified.
//!
//! Records of disabled types, or of types missing from the registry, never
//! contribute to a result.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
  calendar::{DayKey, WeekRange},
  drink::{DrinkRecord, DrinkType},
  goal::GoalConfig,
};

/// Pure aggregation over an immutable snapshot of intake data.
#[derive(Debug, Clone, Copy)]
pub struct IntakeAggregator<'a, Tz: TimeZone> {
  records: &'a [DrinkRecord],
  types:   &'a [DrinkType],
  tz:      &'a Tz,
}

impl<'a, Tz: TimeZone> IntakeAggregator<'a, Tz> {
  pub fn new(
    records: &'a [DrinkRecord],
    types: &'a [DrinkType],
    tz: &'a Tz,
  ) -> Self {
    Self { records, types, tz }
  }

  pub fn records(&self) -> &'a [DrinkRecord] { self.records }

  pub fn types(&self) -> &'a [DrinkType] { self.types }

  /// The local day on which `instant` falls.
  pub fn day_of(&self, instant: &DateTime<Utc>) -> DayKey {
    DayKey::of(instant, self.tz)
  }

  /// Enabled types in registry order.
  pub fn enabled_types(&self) -> impl Iterator<Item = &'a DrinkType> {
    self.types.iter().filter(|t| t.enabled)
  }

  fn is_enabled(&self, type_id: Uuid) -> bool {
    self.types.iter().any(|t| t.type_id == type_id && t.enabled)
  }

  // ── Day ─────────────────────────────────────────────────────────────────

  /// Records logged on `day` whose type is enabled, newest first.
  pub fn filter_by_day(&self, day: DayKey) -> Vec<&'a DrinkRecord> {
    let mut filtered: Vec<&'a DrinkRecord> = self
      .records
      .iter()
      .filter(|r| DayKey::of(&r.timestamp, self.tz) == day)
      .collect();
    sort_newest_first(&mut filtered);
    filtered.retain(|r| self.is_enabled(r.type_id));
    filtered
  }

  /// Amount of `type_id` consumed on `day`; `0.0` when nothing matches.
  pub fn type_amount_by_day(&self, type_id: Uuid, day: DayKey) -> f64 {
    sum_amounts(
      self
        .filter_by_day(day)
        .into_iter()
        .filter(|r| r.type_id == type_id),
    )
  }

  /// Sum of [`Self::type_amount_by_day`] over every enabled type.
  pub fn total_amount_by_day(&self, day: DayKey) -> f64 {
    self
      .enabled_types()
      .map(|t| self.type_amount_by_day(t.type_id, day))
      .fold(0.0, |acc, amount| acc + amount)
  }

  /// Progress toward the daily goal as a fraction. Not clamped: values above
  /// `1.0` mean the goal was exceeded.
  pub fn total_percent_by_day(&self, day: DayKey, goal: &GoalConfig) -> f64 {
    self.total_amount_by_day(day) / goal.daily_goal()
  }

  /// One type's share of the daily goal.
  pub fn type_percent_by_day(
    &self,
    type_id: Uuid,
    day: DayKey,
    goal: &GoalConfig,
  ) -> f64 {
    self.type_amount_by_day(type_id, day) / goal.daily_goal()
  }

  // ── Week ────────────────────────────────────────────────────────────────

  /// The Sunday–Saturday week containing `day`.
  pub fn week_range(&self, day: DayKey) -> WeekRange {
    WeekRange::containing(day)
  }

  /// The seven days of the week containing `day`, Sunday first.
  pub fn days_in_week(&self, day: DayKey) -> [DayKey; 7] {
    WeekRange::containing(day).days()
  }

  /// Records logged during `week` whose type is enabled, newest first.
  pub fn filter_by_week(&self, week: &WeekRange) -> Vec<&'a DrinkRecord> {
    let mut filtered: Vec<&'a DrinkRecord> = week
      .days()
      .into_iter()
      .flat_map(|day| self.filter_by_day(day))
      .collect();
    sort_newest_first(&mut filtered);
    filtered
  }

  pub fn type_amount_by_week(&self, type_id: Uuid, week: &WeekRange) -> f64 {
    sum_amounts(
      self
        .filter_by_week(week)
        .into_iter()
        .filter(|r| r.type_id == type_id),
    )
  }

  pub fn total_amount_by_week(&self, week: &WeekRange) -> f64 {
    self
      .enabled_types()
      .map(|t| self.type_amount_by_week(t.type_id, week))
      .fold(0.0, |acc, amount| acc + amount)
  }

  /// Progress toward the weekly goal (`daily_goal * 7`) as a fraction.
  pub fn total_percent_by_week(
    &self,
    week: &WeekRange,
    goal: &GoalConfig,
  ) -> f64 {
    self.total_amount_by_week(week) / goal.weekly_goal()
  }

  pub fn type_percent_by_week(
    &self,
    type_id: Uuid,
    week: &WeekRange,
    goal: &GoalConfig,
  ) -> f64 {
    self.type_amount_by_week(type_id, week) / goal.weekly_goal()
  }
}

fn sort_newest_first(records: &mut [&DrinkRecord]) {
  records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

fn sum_amounts<'r>(records: impl Iterator<Item = &'r DrinkRecord>) -> f64 {
  records.fold(0.0, |acc, r| acc + r.amount)
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, FixedOffset};

  use super::*;
  use crate::drink::DrinkTypeKind;

  // 2024-03-04 is a Monday.
  fn at(d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
  }

  fn monday() -> DayKey { DayKey::from_ymd(2024, 3, 4).unwrap() }

  fn record(types: &[DrinkType], kind: DrinkTypeKind, amount: f64, ts: DateTime<Utc>) -> DrinkRecord {
    let ty = types.iter().find(|t| t.kind == kind).unwrap();
    DrinkRecord {
      record_id: Uuid::new_v4(),
      timestamp: ts,
      amount,
      type_id: ty.type_id,
    }
  }

  fn registry_with_coffee_disabled() -> Vec<DrinkType> {
    let mut types = DrinkType::defaults();
    for t in &mut types {
      if t.kind == DrinkTypeKind::Coffee {
        t.enabled = false;
      }
    }
    types
  }

  fn type_id(types: &[DrinkType], kind: DrinkTypeKind) -> Uuid {
    types.iter().find(|t| t.kind == kind).unwrap().type_id
  }

  #[test]
  fn monday_water_and_disabled_coffee() {
    let types = registry_with_coffee_disabled();
    let records = vec![
      record(&types, DrinkTypeKind::Water, 500.0, at(4, 9)),
      record(&types, DrinkTypeKind::Coffee, 300.0, at(4, 10)),
    ];
    let goal = GoalConfig::new(2000.0).unwrap();
    let agg = IntakeAggregator::new(&records, &types, &Utc);
    let water = type_id(&types, DrinkTypeKind::Water);

    assert_eq!(agg.type_amount_by_day(water, monday()), 500.0);
    assert_eq!(agg.total_amount_by_day(monday()), 500.0);
    assert_eq!(agg.total_percent_by_day(monday(), &goal), 0.25);
  }

  #[test]
  fn filter_by_day_contains_record_iff_type_enabled() {
    let types = registry_with_coffee_disabled();
    let records = vec![
      record(&types, DrinkTypeKind::Water, 250.0, at(4, 8)),
      record(&types, DrinkTypeKind::Coffee, 200.0, at(5, 7)),
      record(&types, DrinkTypeKind::Juice, 150.0, at(6, 23)),
      record(&types, DrinkTypeKind::Soda, 330.0, at(7, 0)),
    ];
    let agg = IntakeAggregator::new(&records, &types, &Utc);

    for r in &records {
      let day = agg.day_of(&r.timestamp);
      let found = agg
        .filter_by_day(day)
        .iter()
        .any(|f| f.record_id == r.record_id);
      let enabled = types.iter().any(|t| t.type_id == r.type_id && t.enabled);
      assert_eq!(found, enabled);
    }
  }

  #[test]
  fn filter_by_day_sorts_newest_first_and_ignores_other_days() {
    let types = DrinkType::defaults();
    let records = vec![
      record(&types, DrinkTypeKind::Water, 100.0, at(4, 8)),
      record(&types, DrinkTypeKind::Water, 200.0, at(4, 20)),
      record(&types, DrinkTypeKind::Water, 300.0, at(3, 20)),
      record(&types, DrinkTypeKind::Juice, 400.0, at(4, 12)),
    ];
    let agg = IntakeAggregator::new(&records, &types, &Utc);

    let amounts: Vec<f64> =
      agg.filter_by_day(monday()).iter().map(|r| r.amount).collect();
    assert_eq!(amounts, [200.0, 400.0, 100.0]);
  }

  #[test]
  fn day_boundaries_follow_the_time_zone() {
    let types = DrinkType::defaults();
    // 23:30 UTC on Monday is already Tuesday in UTC+2.
    let late = Utc.with_ymd_and_hms(2024, 3, 4, 23, 30, 0).unwrap();
    let records = vec![record(&types, DrinkTypeKind::Water, 250.0, late)];
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();

    let utc_agg = IntakeAggregator::new(&records, &types, &Utc);
    let local_agg = IntakeAggregator::new(&records, &types, &tz);

    assert_eq!(utc_agg.total_amount_by_day(monday()), 250.0);
    assert_eq!(local_agg.total_amount_by_day(monday()), 0.0);
    assert_eq!(local_agg.total_amount_by_day(monday().succ()), 250.0);
  }

  #[test]
  fn type_matching_uses_identity_not_name() {
    let mut types = DrinkType::defaults();
    let mut impostor = DrinkType::default_of(DrinkTypeKind::Water).unwrap();
    impostor.kind = DrinkTypeKind::Custom;
    types.push(impostor.clone());

    let records = vec![
      record(&types, DrinkTypeKind::Water, 100.0, at(4, 9)),
      DrinkRecord {
        record_id: Uuid::new_v4(),
        timestamp: at(4, 10),
        amount:    40.0,
        type_id:   impostor.type_id,
      },
    ];
    let agg = IntakeAggregator::new(&records, &types, &Utc);

    let water = type_id(&types, DrinkTypeKind::Water);
    assert_eq!(agg.type_amount_by_day(water, monday()), 100.0);
    assert_eq!(agg.type_amount_by_day(impostor.type_id, monday()), 40.0);
    assert_eq!(agg.total_amount_by_day(monday()), 140.0);
  }

  #[test]
  fn records_of_unknown_types_are_ignored() {
    let types = DrinkType::defaults();
    let records = vec![DrinkRecord {
      record_id: Uuid::new_v4(),
      timestamp: at(4, 9),
      amount:    999.0,
      type_id:   Uuid::new_v4(),
    }];
    let agg = IntakeAggregator::new(&records, &types, &Utc);
    assert!(agg.filter_by_day(monday()).is_empty());
    assert_eq!(agg.total_amount_by_day(monday()), 0.0);
  }

  #[test]
  fn total_equals_sum_of_type_amounts() {
    let types = registry_with_coffee_disabled();
    let records: Vec<DrinkRecord> = (0..40)
      .map(|i| {
        let kind = DrinkTypeKind::DEFAULTS[i % 4];
        let amount = 0.1 * (i as f64 + 1.0) + 37.3;
        record(&types, kind, amount, at(4, 0) + Duration::minutes(i as i64 * 30))
      })
      .collect();
    let agg = IntakeAggregator::new(&records, &types, &Utc);

    let expected = types
      .iter()
      .filter(|t| t.enabled)
      .map(|t| agg.type_amount_by_day(t.type_id, monday()))
      .fold(0.0, |acc, a| acc + a);
    assert_eq!(agg.total_amount_by_day(monday()), expected);

    let week = agg.week_range(monday());
    let expected_week = types
      .iter()
      .filter(|t| t.enabled)
      .map(|t| agg.type_amount_by_week(t.type_id, &week))
      .fold(0.0, |acc, a| acc + a);
    assert_eq!(agg.total_amount_by_week(&week), expected_week);
  }

  #[test]
  fn percent_is_not_clamped() {
    let types = DrinkType::defaults();
    let records = vec![
      record(&types, DrinkTypeKind::Water, 1500.0, at(4, 9)),
      record(&types, DrinkTypeKind::Juice, 1500.0, at(4, 12)),
    ];
    let goal = GoalConfig::new(2000.0).unwrap();
    let agg = IntakeAggregator::new(&records, &types, &Utc);
    assert_eq!(agg.total_percent_by_day(monday(), &goal), 1.5);

    let water = type_id(&types, DrinkTypeKind::Water);
    assert_eq!(agg.type_percent_by_day(water, monday(), &goal), 0.75);
  }

  #[test]
  fn week_spans_sunday_to_saturday() {
    let types = DrinkType::defaults();
    let records = vec![
      record(&types, DrinkTypeKind::Water, 100.0, at(2, 23)), // Saturday before
      record(&types, DrinkTypeKind::Water, 200.0, at(3, 0)),  // Sunday
      record(&types, DrinkTypeKind::Coffee, 300.0, at(6, 12)), // Wednesday
      record(&types, DrinkTypeKind::Water, 400.0, at(9, 23)), // Saturday
      record(&types, DrinkTypeKind::Water, 500.0, at(10, 0)), // next Sunday
    ];
    let goal = GoalConfig::new(100.0).unwrap();
    let agg = IntakeAggregator::new(&records, &types, &Utc);
    let week = agg.week_range(monday());

    let amounts: Vec<f64> =
      agg.filter_by_week(&week).iter().map(|r| r.amount).collect();
    assert_eq!(amounts, [400.0, 300.0, 200.0]);

    let water = type_id(&types, DrinkTypeKind::Water);
    assert_eq!(agg.type_amount_by_week(water, &week), 600.0);
    assert_eq!(agg.total_amount_by_week(&week), 900.0);
    assert_eq!(
      agg.total_percent_by_week(&week, &goal),
      agg.total_amount_by_week(&week) / (goal.daily_goal() * 7.0)
    );
  }

  #[test]
  fn weekly_percent_follows_goal_changes() {
    let types = DrinkType::defaults();
    let records = vec![record(&types, DrinkTypeKind::Water, 7000.0, at(5, 9))];
    let agg = IntakeAggregator::new(&records, &types, &Utc);
    let week = agg.week_range(monday());

    let before = GoalConfig::new(2000.0).unwrap();
    let after = GoalConfig::new(1000.0).unwrap();
    assert_eq!(agg.total_percent_by_week(&week, &before), 0.5);
    assert_eq!(agg.total_percent_by_week(&week, &after), 1.0);
  }

  #[test]
  fn disabled_types_are_excluded_from_week() {
    let types = registry_with_coffee_disabled();
    let records = vec![
      record(&types, DrinkTypeKind::Coffee, 300.0, at(5, 9)),
      record(&types, DrinkTypeKind::Water, 300.0, at(5, 10)),
    ];
    let agg = IntakeAggregator::new(&records, &types, &Utc);
    let week = agg.week_range(monday());
    let coffee = type_id(&types, DrinkTypeKind::Coffee);

    assert_eq!(agg.filter_by_week(&week).len(), 1);
    assert_eq!(agg.type_amount_by_week(coffee, &week), 0.0);
    assert_eq!(agg.total_amount_by_week(&week), 300.0);
  }

  #[test]
  fn empty_collection_yields_zero_everywhere() {
    let types = DrinkType::defaults();
    let records: Vec<DrinkRecord> = Vec::new();
    let goal = GoalConfig::new(2000.0).unwrap();
    let agg = IntakeAggregator::new(&records, &types, &Utc);
    let week = agg.week_range(monday());
    let water = type_id(&types, DrinkTypeKind::Water);

    assert!(agg.filter_by_day(monday()).is_empty());
    assert!(agg.filter_by_week(&week).is_empty());
    assert_eq!(agg.type_amount_by_day(water, monday()), 0.0);
    assert_eq!(agg.total_amount_by_day(monday()), 0.0);
    assert_eq!(agg.total_percent_by_day(monday(), &goal), 0.0);
    assert_eq!(agg.type_amount_by_week(water, &week), 0.0);
    assert_eq!(agg.total_amount_by_week(&week), 0.0);
    assert_eq!(agg.total_percent_by_week(&week, &goal), 0.0);
  }

  #[test]
  fn repeated_calls_are_identical() {
    let types = DrinkType::defaults();
    let records = vec![
      record(&types, DrinkTypeKind::Water, 120.5, at(4, 9)),
      record(&types, DrinkTypeKind::Soda, 330.0, at(6, 9)),
    ];
    let goal = GoalConfig::new(2000.0).unwrap();
    let agg = IntakeAggregator::new(&records, &types, &Utc);
    let week = agg.week_range(monday());

    assert_eq!(agg.filter_by_day(monday()), agg.filter_by_day(monday()));
    assert_eq!(agg.filter_by_week(&week), agg.filter_by_week(&week));
    assert_eq!(
      agg.total_percent_by_week(&week, &goal),
      agg.total_percent_by_week(&week, &goal)
    );
    assert_eq!(records.len(), 2);
  }

  #[test]
  fn days_in_week_matches_range() {
    let types = DrinkType::defaults();
    let agg = IntakeAggregator::new(&[], &types, &Utc);
    let days = agg.days_in_week(monday());
    let range = agg.week_range(monday());
    assert_eq!(days[0], range.start);
    assert_eq!(days[6], range.end);
  }

  /// Records straddling both edges of `day` land on the side `utc_bounds`
  /// puts them.
  fn assert_filter_matches_bounds<Tz: TimeZone>(tz: &Tz, day: DayKey) {
    let types = DrinkType::defaults();
    let (start, end) = day.utc_bounds(tz).unwrap();
    let second = Duration::seconds(1);
    let records = vec![
      record(&types, DrinkTypeKind::Water, 1.0, start - second),
      record(&types, DrinkTypeKind::Water, 2.0, start),
      record(&types, DrinkTypeKind::Water, 4.0, end - second),
      record(&types, DrinkTypeKind::Water, 8.0, end),
    ];
    let agg = IntakeAggregator::new(&records, &types, tz);

    let amounts: Vec<f64> = agg.filter_by_day(day).iter().map(|r| r.amount).collect();
    assert_eq!(amounts, [4.0, 2.0], "{day}");
    for r in &records {
      let inside = start <= r.timestamp && r.timestamp < end;
      assert_eq!(agg.day_of(&r.timestamp) == day, inside, "{day} {}", r.timestamp);
    }
  }

  #[test]
  fn day_filter_agrees_with_bounds_across_dst() {
    use chrono_tz::America::{New_York, Sao_Paulo};

    assert_filter_matches_bounds(&New_York, DayKey::from_ymd(2024, 3, 10).unwrap());
    assert_filter_matches_bounds(&New_York, DayKey::from_ymd(2024, 11, 3).unwrap());
    assert_filter_matches_bounds(&Sao_Paulo, DayKey::from_ymd(2018, 11, 4).unwrap());
    assert_filter_matches_bounds(&Sao_Paulo, DayKey::from_ymd(2018, 11, 3).unwrap());
  }
}
