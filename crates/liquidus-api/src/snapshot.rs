//! Per-request snapshots of store data and reference-date resolution.
//!
//! Every handler that aggregates loads a fresh [`Snapshot`] and builds an
//! [`IntakeAggregator`] over it; nothing is cached between requests.

use chrono::{DateTime, Local, Utc};
use liquidus_core::{
  aggregate::IntakeAggregator,
  calendar::DayKey,
  drink::{DrinkRecord, DrinkType},
  goal::Settings,
  store::{DrinkQuery, IntakeStore},
};

use crate::error::ApiError;

/// Records (optionally bounded), the type registry and settings, read at the
/// start of a request.
pub struct Snapshot {
  pub records:  Vec<DrinkRecord>,
  pub types:    Vec<DrinkType>,
  pub settings: Settings,
}

impl Snapshot {
  /// Load a snapshot. With `bounds`, only records inside the half-open UTC
  /// window are read.
  pub async fn load<S>(
    store: &S,
    bounds: Option<(DateTime<Utc>, DateTime<Utc>)>,
  ) -> Result<Self, ApiError>
  where
    S: IntakeStore,
  {
    let query = bounds
      .map(|(from, until)| DrinkQuery::between(from, until))
      .unwrap_or_default();

    let records = store.list_drinks(query).await.map_err(ApiError::store)?;
    let types = store.list_drink_types().await.map_err(ApiError::store)?;
    let settings = store.settings().await.map_err(ApiError::store)?;

    Ok(Self { records, types, settings })
  }

  /// An aggregator over this snapshot in the server's local calendar.
  pub fn aggregator(&self) -> IntakeAggregator<'_, Local> {
    IntakeAggregator::new(&self.records, &self.types, &Local)
  }
}

/// The reference day a request asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
  Day(DayKey),
  /// The `date` parameter was present but not a `YYYY-MM-DD` date.
  Malformed(String),
}

/// Resolve an optional `date` query parameter. A missing date means today.
pub fn resolve_date(raw: Option<&str>) -> Reference {
  match raw {
    None => Reference::Day(DayKey::today(&Local)),
    Some(s) => match DayKey::parse(s) {
      Some(day) => Reference::Day(day),
      None => {
        tracing::warn!(date = s, "malformed reference date; treating as no data");
        Reference::Malformed(s.to_owned())
      }
    },
  }
}
