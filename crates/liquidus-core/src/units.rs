//! Volume units and conversion between them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Millilitres in one US fluid ounce.
pub const ML_PER_FL_OZ: f64 = 29.5735;

/// The unit every stored amount and the daily goal are expressed in.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum Units {
  #[default]
  #[serde(rename = "ml")]
  Milliliters,
  #[serde(rename = "oz")]
  Ounces,
}

impl Units {
  /// Short symbol shown next to amounts.
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Milliliters => "mL",
      Self::Ounces => "oz",
    }
  }

  /// The default daily goal for a fresh store in these units.
  pub fn default_daily_goal(self) -> f64 {
    match self {
      Self::Milliliters => 2000.0,
      Self::Ounces => 64.0,
    }
  }

  /// Convert `amount` expressed in `self` into `target`.
  pub fn convert(self, amount: f64, target: Units) -> f64 {
    match (self, target) {
      (Self::Milliliters, Self::Ounces) => amount / ML_PER_FL_OZ,
      (Self::Ounces, Self::Milliliters) => amount * ML_PER_FL_OZ,
      _ => amount,
    }
  }
}

impl fmt::Display for Units {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

impl FromStr for Units {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "ml" | "milliliters" | "millilitres" => Ok(Self::Milliliters),
      "oz" | "ounces" | "fl oz" => Ok(Self::Ounces),
      other => Err(Error::UnknownUnits(other.to_owned())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn converting_to_same_unit_is_identity() {
    assert_eq!(Units::Ounces.convert(12.5, Units::Ounces), 12.5);
    assert_eq!(Units::Milliliters.convert(330.0, Units::Milliliters), 330.0);
  }

  #[test]
  fn one_ounce_in_milliliters() {
    assert_eq!(Units::Ounces.convert(1.0, Units::Milliliters), ML_PER_FL_OZ);
    let back = Units::Milliliters.convert(ML_PER_FL_OZ, Units::Ounces);
    assert!((back - 1.0).abs() < 1e-12);
  }

  #[test]
  fn parse_accepts_symbols_and_names() {
    assert_eq!("ml".parse::<Units>().unwrap(), Units::Milliliters);
    assert_eq!(" OZ ".parse::<Units>().unwrap(), Units::Ounces);
    assert_eq!("Ounces".parse::<Units>().unwrap(), Units::Ounces);
    assert!(matches!("cups".parse::<Units>(), Err(Error::UnknownUnits(_))));
  }

  #[test]
  fn serde_uses_short_names() {
    assert_eq!(serde_json::to_string(&Units::Ounces).unwrap(), "\"oz\"");
    let u: Units = serde_json::from_str("\"ml\"").unwrap();
    assert_eq!(u, Units::Milliliters);
  }
}
