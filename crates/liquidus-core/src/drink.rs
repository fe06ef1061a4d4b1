//! Drink records and the drink types they refer to.
//!
//! A record is an immutable log entry: once written, no field changes. The
//! only mutable state a type carries is its `enabled` flag, which decides
//! whether its records take part in aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Drink types ─────────────────────────────────────────────────────────────

/// Which of the built-in categories a type is, or `Custom` for user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkTypeKind {
  Water,
  Coffee,
  Soda,
  Juice,
  Custom,
}

impl DrinkTypeKind {
  /// The built-in kinds, in the order they are seeded.
  pub const DEFAULTS: [DrinkTypeKind; 4] =
    [Self::Water, Self::Coffee, Self::Soda, Self::Juice];

  pub fn is_default(self) -> bool { !matches!(self, Self::Custom) }

  /// Display name given to a freshly seeded default type.
  pub fn default_name(self) -> Option<&'static str> {
    match self {
      Self::Water => Some("Water"),
      Self::Coffee => Some("Coffee"),
      Self::Soda => Some("Soda"),
      Self::Juice => Some("Juice"),
      Self::Custom => None,
    }
  }
}

/// A drink category from the type registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkType {
  pub type_id:          Uuid,
  pub name:             String,
  pub kind:             DrinkTypeKind,
  /// Disabled types are excluded from every aggregation result.
  pub enabled:          bool,
  /// How much of a drink counts toward hydration; 1.0 for plain water.
  pub hydration_factor: f64,
}

impl DrinkType {
  /// Build one of the default types with a fresh identifier.
  pub fn default_of(kind: DrinkTypeKind) -> Option<Self> {
    kind.default_name().map(|name| Self {
      type_id: Uuid::new_v4(),
      name: name.to_owned(),
      kind,
      enabled: true,
      hydration_factor: 1.0,
    })
  }

  /// The four default types, all enabled.
  pub fn defaults() -> Vec<Self> {
    DrinkTypeKind::DEFAULTS
      .into_iter()
      .filter_map(Self::default_of)
      .collect()
  }
}

/// Input to [`crate::store::IntakeStore::add_drink_type`]. Always creates a
/// custom type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDrinkType {
  pub name:             String,
  #[serde(default = "one")]
  pub hydration_factor: f64,
}

fn one() -> f64 { 1.0 }

impl NewDrinkType {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), hydration_factor: 1.0 }
  }

  /// Check the name against the existing registry. Names are compared
  /// case-insensitively after trimming. The hydration factor must be finite
  /// and non-negative.
  pub fn validate(&self, existing: &[DrinkType]) -> Result<()> {
    let name = self.name.trim();
    if name.is_empty() {
      return Err(Error::EmptyTypeName);
    }
    if !self.hydration_factor.is_finite() || self.hydration_factor < 0.0 {
      return Err(Error::InvalidHydrationFactor(self.hydration_factor));
    }
    if existing.iter().any(|t| t.name.trim().eq_ignore_ascii_case(name)) {
      return Err(Error::DuplicateTypeName(name.to_owned()));
    }
    Ok(())
  }
}

/// Look a type up by identifier.
pub fn find_type(types: &[DrinkType], type_id: Uuid) -> Option<&DrinkType> {
  types.iter().find(|t| t.type_id == type_id)
}

/// Look a type up by display name, case-insensitively.
pub fn find_type_by_name<'a>(
  types: &'a [DrinkType],
  name: &str,
) -> Option<&'a DrinkType> {
  let name = name.trim();
  types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

// ─── Drink records ───────────────────────────────────────────────────────────

/// A single logged drink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkRecord {
  pub record_id: Uuid,
  pub timestamp: DateTime<Utc>,
  /// Volume in the store's current units.
  pub amount:    f64,
  pub type_id:   Uuid,
}

/// Input to [`crate::store::IntakeStore::record_drink`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDrinkRecord {
  pub amount:    f64,
  pub type_id:   Uuid,
  /// Defaults to the time the store receives the record.
  pub timestamp: Option<DateTime<Utc>>,
}

impl NewDrinkRecord {
  pub fn new(type_id: Uuid, amount: f64) -> Self {
    Self { amount, type_id, timestamp: None }
  }

  pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
    self.timestamp = Some(timestamp);
    self
  }

  /// Amounts must be finite and non-negative, and the type must exist.
  pub fn validate(&self, types: &[DrinkType]) -> Result<()> {
    if !self.amount.is_finite() || self.amount < 0.0 {
      return Err(Error::InvalidAmount(self.amount));
    }
    if find_type(types, self.type_id).is_none() {
      return Err(Error::UnknownDrinkType(self.type_id));
    }
    Ok(())
  }
}
