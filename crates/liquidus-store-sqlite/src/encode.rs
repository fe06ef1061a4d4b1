//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that lexicographic order matches chronological
//! order and range queries can compare strings directly. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use liquidus_core::{
  drink::{DrinkRecord, DrinkType, DrinkTypeKind},
  goal::{GoalConfig, Settings},
  units::Units,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── DrinkTypeKind ────────────────────────────────────────────────────────────

pub fn encode_kind(k: DrinkTypeKind) -> &'static str {
  match k {
    DrinkTypeKind::Water => "water",
    DrinkTypeKind::Coffee => "coffee",
    DrinkTypeKind::Soda => "soda",
    DrinkTypeKind::Juice => "juice",
    DrinkTypeKind::Custom => "custom",
  }
}

pub fn decode_kind(s: &str) -> Result<DrinkTypeKind> {
  match s {
    "water" => Ok(DrinkTypeKind::Water),
    "coffee" => Ok(DrinkTypeKind::Coffee),
    "soda" => Ok(DrinkTypeKind::Soda),
    "juice" => Ok(DrinkTypeKind::Juice),
    "custom" => Ok(DrinkTypeKind::Custom),
    other => Err(Error::Decode(format!("unknown drink type kind: {other:?}"))),
  }
}

// ─── Units ────────────────────────────────────────────────────────────────────

pub fn encode_units(u: Units) -> &'static str {
  match u {
    Units::Milliliters => "ml",
    Units::Ounces => "oz",
  }
}

pub fn decode_units(s: &str) -> Result<Units> {
  match s {
    "ml" => Ok(Units::Milliliters),
    "oz" => Ok(Units::Ounces),
    other => Err(Error::Decode(format!("unknown units: {other:?}"))),
  }
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// Column values of a `drink_types` row before decoding.
pub struct RawDrinkType {
  pub type_id:          String,
  pub name:             String,
  pub kind:             String,
  pub enabled:          bool,
  pub hydration_factor: f64,
}

impl RawDrinkType {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      type_id:          row.get(0)?,
      name:             row.get(1)?,
      kind:             row.get(2)?,
      enabled:          row.get(3)?,
      hydration_factor: row.get(4)?,
    })
  }

  pub fn into_drink_type(self) -> Result<DrinkType> {
    Ok(DrinkType {
      type_id:          decode_uuid(&self.type_id)?,
      name:             self.name,
      kind:             decode_kind(&self.kind)?,
      enabled:          self.enabled,
      hydration_factor: self.hydration_factor,
    })
  }
}

/// Column values of a `drinks` row before decoding.
pub struct RawDrinkRecord {
  pub record_id: String,
  pub timestamp: String,
  pub amount:    f64,
  pub type_id:   String,
}

impl RawDrinkRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id: row.get(0)?,
      timestamp: row.get(1)?,
      amount:    row.get(2)?,
      type_id:   row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<DrinkRecord> {
    Ok(DrinkRecord {
      record_id: decode_uuid(&self.record_id)?,
      timestamp: decode_dt(&self.timestamp)?,
      amount:    self.amount,
      type_id:   decode_uuid(&self.type_id)?,
    })
  }
}

/// Column values of the `settings` row before decoding.
pub struct RawSettings {
  pub daily_goal:       f64,
  pub units:            String,
  pub last_health_sync: Option<String>,
}

impl RawSettings {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      daily_goal:       row.get(0)?,
      units:            row.get(1)?,
      last_health_sync: row.get(2)?,
    })
  }

  pub fn into_settings(self) -> Result<Settings> {
    Ok(Settings {
      goal:             GoalConfig::new(self.daily_goal)?,
      units:            decode_units(&self.units)?,
      last_health_sync: self
        .last_health_sync
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let early = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
    let later = early + chrono::Duration::milliseconds(1500);
    let (a, b) = (encode_dt(early), encode_dt(later));
    assert_eq!(a.len(), b.len());
    assert!(a < b);
    assert_eq!(decode_dt(&b).unwrap(), later);
  }

  #[test]
  fn kinds_round_trip() {
    for kind in DrinkTypeKind::DEFAULTS
      .into_iter()
      .chain([DrinkTypeKind::Custom])
    {
      assert_eq!(decode_kind(encode_kind(kind)).unwrap(), kind);
    }
    assert!(decode_kind("tea").is_err());
  }
}
