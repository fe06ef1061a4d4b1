//! Import of samples from an external health-data store.
//!
//! Platform health services are reached through the [`HealthSource`] trait.
//! The aggregator never talks to a source; importing is a separate step that
//! turns samples into ordinary drink records via [`plan_import`].

use std::future::Future;

use chrono::{DateTime, Duration, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  drink::{DrinkRecord, DrinkType, NewDrinkRecord},
  units::Units,
};

/// A single water-intake sample as reported by an external store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalSample {
  pub timestamp: DateTime<Utc>,
  /// Volume in millilitres, regardless of the user's display units.
  pub amount_ml: f64,
}

/// An external health-data store that can supply water-intake samples.
pub trait HealthSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Ask the user (or platform) for read access. `Ok(false)` means denied.
  fn request_authorization(
    &self,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Samples recorded at or after `since`, or all samples when `None`.
  fn fetch_external_samples(
    &self,
    since: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<Vec<ExternalSample>, Self::Error>> + Send + '_;
}

/// Amounts closer than this are considered the same sample.
const AMOUNT_EPSILON: f64 = 1e-6;

/// Sub-second digits kept by stores; timestamps are compared at this
/// precision.
const TIMESTAMP_DIGITS: u16 = 6;

/// How far before the last sync a fetch reaches back, so that samples
/// exported late with an earlier timestamp are still seen.
pub const SYNC_LOOKBACK_DAYS: i64 = 7;

/// Where the next fetch should start, given the time of the last sync.
pub fn sync_window_start(last_sync: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
  last_sync.map(|at| at - Duration::days(SYNC_LOOKBACK_DAYS))
}

/// Decide which samples become new records.
///
/// Samples are converted into `units` and attributed to `water`, with their
/// timestamps cut to microseconds. A sample is skipped when its amount is
/// negative or not finite, when an existing record of the water type has the
/// same timestamp and amount, or when it repeats an earlier sample in the
/// same batch.
pub fn plan_import(
  existing: &[DrinkRecord],
  samples: &[ExternalSample],
  water: &DrinkType,
  units: Units,
) -> Vec<NewDrinkRecord> {
  let mut planned: Vec<NewDrinkRecord> = Vec::new();

  for sample in samples {
    if !sample.amount_ml.is_finite() || sample.amount_ml < 0.0 {
      continue;
    }
    let amount = Units::Milliliters.convert(sample.amount_ml, units);
    let timestamp = sample.timestamp.trunc_subsecs(TIMESTAMP_DIGITS);

    let already_stored = existing.iter().any(|r| {
      r.type_id == water.type_id
        && r.timestamp.trunc_subsecs(TIMESTAMP_DIGITS) == timestamp
        && (r.amount - amount).abs() < AMOUNT_EPSILON
    });
    let already_planned = planned.iter().any(|p| {
      p.timestamp == Some(timestamp) && (p.amount - amount).abs() < AMOUNT_EPSILON
    });

    if !already_stored && !already_planned {
      planned.push(NewDrinkRecord::new(water.type_id, amount).at(timestamp));
    }
  }

  planned
}
