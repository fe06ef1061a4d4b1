//! Local-calendar day and week arithmetic.
//!
//! Every computation here works in whole calendar days on [`NaiveDate`], so
//! daylight-saving transitions never shift a day boundary. Instants are
//! mapped onto the calendar through a [`TimeZone`] supplied by the caller.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Offset as _, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ─── DayKey ──────────────────────────────────────────────────────────────────

/// Identity of a local calendar day, independent of time-of-day.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
  pub fn new(date: NaiveDate) -> Self { Self(date) }

  pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
    NaiveDate::from_ymd_opt(year, month, day).map(Self)
  }

  /// The local calendar day on which `instant` falls in `tz`.
  pub fn of<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> Self {
    Self(instant.with_timezone(tz).date_naive())
  }

  /// The current local day in `tz`.
  pub fn today<Tz: TimeZone>(tz: &Tz) -> Self { Self::of(&Utc::now(), tz) }

  /// Parse an ISO `YYYY-MM-DD` date. Anything else yields `None`.
  pub fn parse(s: &str) -> Option<Self> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(Self)
  }

  pub fn date(self) -> NaiveDate { self.0 }

  /// Weekday number with Sunday first: Sunday = 1 … Saturday = 7.
  pub fn weekday_number(self) -> u32 { self.0.weekday().number_from_sunday() }

  /// Calendar-day addition; negative values move backwards.
  pub fn add_days(self, days: i64) -> Self { Self(self.0 + Duration::days(days)) }

  pub fn succ(self) -> Self { self.add_days(1) }

  pub fn pred(self) -> Self { self.add_days(-1) }

  /// The first instant of this day in `tz`, as UTC.
  ///
  /// When local midnight is skipped by a daylight-saving jump, the day starts
  /// at the transition itself.
  pub fn start_in<Tz: TimeZone>(self, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = self.0.and_hms_opt(0, 0, 0)?;
    if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
      return Some(start.with_timezone(&Utc));
    }

    // Midnight under the offset in force just before the gap.
    let before = tz
      .from_local_datetime(&(midnight - Duration::hours(12)))
      .earliest()?;
    let offset = before.offset().fix().local_minus_utc();
    Some(midnight.and_utc() - Duration::seconds(i64::from(offset)))
  }

  /// Half-open UTC bounds `[start, next day's start)` of this day in `tz`.
  pub fn utc_bounds<Tz: TimeZone>(
    self,
    tz: &Tz,
  ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((self.start_in(tz)?, self.succ().start_in(tz)?))
  }
}

impl From<NaiveDate> for DayKey {
  fn from(date: NaiveDate) -> Self { Self(date) }
}

impl fmt::Display for DayKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format("%Y-%m-%d"))
  }
}

// ─── WeekRange ───────────────────────────────────────────────────────────────

/// The Sunday–Saturday span containing some reference day.
///
/// Always satisfies `end == start + 6 days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekRange {
  pub start: DayKey,
  pub end:   DayKey,
}

impl WeekRange {
  /// The week (Sunday first) that contains `day`.
  pub fn containing(day: DayKey) -> Self {
    match day.weekday_number() {
      1 => Self { start: day, end: day.add_days(6) },
      7 => Self { start: day.add_days(-6), end: day },
      weekday => {
        let start_offset = i64::from(weekday) - 1;
        let end_offset = 7 - i64::from(weekday);
        Self {
          start: day.add_days(-start_offset),
          end:   day.add_days(end_offset),
        }
      }
    }
  }

  /// The seven days of the week, Sunday through Saturday.
  pub fn days(&self) -> [DayKey; 7] {
    [
      self.start,
      self.start.add_days(1),
      self.start.add_days(2),
      self.start.add_days(3),
      self.start.add_days(4),
      self.start.add_days(5),
      self.end,
    ]
  }

  pub fn contains(&self, day: DayKey) -> bool {
    self.start <= day && day <= self.end
  }

  /// Half-open UTC bounds covering the whole week in `tz`.
  pub fn utc_bounds<Tz: TimeZone>(
    &self,
    tz: &Tz,
  ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((self.start.start_in(tz)?, self.end.succ().start_in(tz)?))
  }
}

/// The Sunday–Saturday range containing `day`.
pub fn week_range(day: DayKey) -> WeekRange { WeekRange::containing(day) }

/// The seven calendar days of the week containing `day`.
pub fn days_in_week(day: DayKey) -> [DayKey; 7] { week_range(day).days() }

#[cfg(test)]
mod tests {
  use chrono::{FixedOffset, Weekday};
  use chrono_tz::America::{New_York, Sao_Paulo};

  use super::*;

  fn day(y: i32, m: u32, d: u32) -> DayKey { DayKey::from_ymd(y, m, d).unwrap() }

  #[test]
  fn instants_on_the_same_local_day_share_a_key() {
    let tz = FixedOffset::west_opt(5 * 3600).unwrap();
    let morning = Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 3, 5, 4, 59, 59).unwrap();
    assert_eq!(DayKey::of(&morning, &tz), DayKey::of(&late, &tz));
    assert_eq!(DayKey::of(&morning, &tz), day(2024, 3, 4));
  }

  #[test]
  fn day_key_follows_the_local_calendar_not_utc() {
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let instant = Utc.with_ymd_and_hms(2024, 3, 4, 20, 0, 0).unwrap();
    assert_eq!(DayKey::of(&instant, &Utc), day(2024, 3, 4));
    assert_eq!(DayKey::of(&instant, &tokyo), day(2024, 3, 5));
  }

  #[test]
  fn wednesday_maps_to_previous_sunday_and_next_saturday() {
    let wed = day(2024, 3, 6);
    assert_eq!(wed.weekday_number(), 4);

    let range = week_range(wed);
    assert_eq!(range.start, day(2024, 3, 3));
    assert_eq!(range.end, day(2024, 3, 9));
  }

  #[test]
  fn sunday_and_saturday_are_their_own_endpoints() {
    let sun = day(2024, 3, 3);
    assert_eq!(week_range(sun), WeekRange { start: sun, end: day(2024, 3, 9) });

    let sat = day(2024, 3, 9);
    assert_eq!(week_range(sat), WeekRange { start: sun, end: sat });
  }

  #[test]
  fn every_day_of_a_year_lands_in_a_sunday_week() {
    // 2024 is a leap year and includes both US and EU DST transitions.
    let mut d = day(2024, 1, 1);
    while d <= day(2024, 12, 31) {
      let range = week_range(d);
      assert_eq!(range.start.date().weekday(), Weekday::Sun, "{d}");
      assert_eq!(range.end.date().weekday(), Weekday::Sat, "{d}");
      assert_eq!((range.end.date() - range.start.date()).num_days(), 6, "{d}");
      assert!(range.contains(d), "{d}");
      d = d.succ();
    }
  }

  #[test]
  fn days_in_week_are_consecutive() {
    let days = days_in_week(day(2024, 12, 31));
    assert_eq!(days[0], day(2024, 12, 29));
    assert_eq!(days[6], day(2025, 1, 4));
    for pair in days.windows(2) {
      assert_eq!(pair[0].succ(), pair[1]);
    }
  }

  #[test]
  fn parse_rejects_malformed_dates() {
    assert_eq!(DayKey::parse("2024-03-06"), Some(day(2024, 3, 6)));
    assert_eq!(DayKey::parse("2024-02-30"), None);
    assert_eq!(DayKey::parse("yesterday"), None);
  }

  #[test]
  fn utc_bounds_span_one_local_day() {
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let (start, end) = day(2024, 3, 6).utc_bounds(&tz).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 5, 22, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 6, 22, 0, 0).unwrap());
  }

  #[test]
  fn spring_forward_day_lasts_23_hours() {
    let (start, end) = day(2024, 3, 10).utc_bounds(&New_York).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 10, 5, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 11, 4, 0, 0).unwrap());
    assert_eq!((end - start).num_hours(), 23);
  }

  #[test]
  fn fall_back_day_lasts_25_hours() {
    let (start, end) = day(2024, 11, 3).utc_bounds(&New_York).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 11, 3, 4, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2024, 11, 4, 5, 0, 0).unwrap());
    assert_eq!((end - start).num_hours(), 25);

    // Both passes through the repeated 01:30 belong to the same day.
    let first = Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 11, 3, 6, 30, 0).unwrap();
    assert_eq!(DayKey::of(&first, &New_York), day(2024, 11, 3));
    assert_eq!(DayKey::of(&second, &New_York), day(2024, 11, 3));
  }

  #[test]
  fn skipped_midnight_starts_the_day_at_the_transition() {
    // Sao Paulo jumped from 00:00 to 01:00 on 2018-11-04.
    let sunday = day(2018, 11, 4);
    let (start, end) = sunday.utc_bounds(&Sao_Paulo).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2018, 11, 4, 3, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2018, 11, 5, 2, 0, 0).unwrap());

    let (_, saturday_end) = sunday.pred().utc_bounds(&Sao_Paulo).unwrap();
    assert_eq!(saturday_end, start);

    assert_eq!(DayKey::of(&start, &Sao_Paulo), sunday);
    let just_before = start - Duration::seconds(1);
    assert_eq!(DayKey::of(&just_before, &Sao_Paulo), sunday.pred());
  }
}
