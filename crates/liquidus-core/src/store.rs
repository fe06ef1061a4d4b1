//! The `IntakeStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `liquidus-store-sqlite`).
//! Higher layers (`liquidus-api`, `liquidus-cli`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  drink::{DrinkRecord, DrinkType, NewDrinkRecord, NewDrinkType},
  goal::{GoalConfig, Settings},
  units::Units,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`IntakeStore::list_drinks`]. Bounds are half-open:
/// `from <= timestamp < until`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrinkQuery {
  pub from:  Option<DateTime<Utc>>,
  pub until: Option<DateTime<Utc>>,
}

impl DrinkQuery {
  pub fn all() -> Self { Self::default() }

  pub fn between(from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
    Self { from: Some(from), until: Some(until) }
  }

  pub fn since(from: DateTime<Utc>) -> Self {
    Self { from: Some(from), until: None }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Liquidus intake store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait IntakeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Drink types ───────────────────────────────────────────────────────

  /// The full type registry in creation order; the defaults come first.
  fn list_drink_types(
    &self,
  ) -> impl Future<Output = Result<Vec<DrinkType>, Self::Error>> + Send + '_;

  /// Create a custom type. Fails if the name is empty or already taken.
  fn add_drink_type(
    &self,
    input: NewDrinkType,
  ) -> impl Future<Output = Result<DrinkType, Self::Error>> + Send + '_;

  /// Enable or disable a type, returning its updated state.
  fn set_type_enabled(
    &self,
    type_id: Uuid,
    enabled: bool,
  ) -> impl Future<Output = Result<DrinkType, Self::Error>> + Send + '_;

  /// Delete a custom type together with every record of that type.
  /// Returns how many records were removed. Default types cannot be deleted.
  fn delete_drink_type(
    &self,
    type_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Drink records ─────────────────────────────────────────────────────

  /// Validate and persist a record. The timestamp defaults to now.
  fn record_drink(
    &self,
    input: NewDrinkRecord,
  ) -> impl Future<Output = Result<DrinkRecord, Self::Error>> + Send + '_;

  /// Remove a record. Returns `false` if it did not exist.
  fn delete_drink(
    &self,
    record_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Records within `query`'s bounds, oldest first.
  fn list_drinks(
    &self,
    query: DrinkQuery,
  ) -> impl Future<Output = Result<Vec<DrinkRecord>, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  fn settings(
    &self,
  ) -> impl Future<Output = Result<Settings, Self::Error>> + Send + '_;

  fn set_daily_goal(
    &self,
    goal: GoalConfig,
  ) -> impl Future<Output = Result<Settings, Self::Error>> + Send + '_;

  /// Switch units, converting every stored amount and the daily goal.
  fn set_units(
    &self,
    units: Units,
  ) -> impl Future<Output = Result<Settings, Self::Error>> + Send + '_;

  fn set_last_health_sync(
    &self,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Settings, Self::Error>> + Send + '_;
}
