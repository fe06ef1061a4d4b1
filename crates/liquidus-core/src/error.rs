//! Error types for `liquidus-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Error)]
pub enum Error {
  #[error("daily goal must be a positive number, got {0}")]
  InvalidGoal(f64),

  #[error("drink amount must be a non-negative number, got {0}")]
  InvalidAmount(f64),

  #[error("drink type not found: {0}")]
  UnknownDrinkType(Uuid),

  #[error("drink type name must not be empty")]
  EmptyTypeName,

  #[error("hydration factor must be a non-negative number, got {0}")]
  InvalidHydrationFactor(f64),

  #[error("a drink type named {0:?} already exists")]
  DuplicateTypeName(String),

  #[error("default drink type {0} cannot be deleted")]
  DefaultTypeImmutable(Uuid),

  #[error("unknown units: {0:?}")]
  UnknownUnits(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
