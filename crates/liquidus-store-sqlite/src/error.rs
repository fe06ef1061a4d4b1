//! Error type for `liquidus-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] liquidus_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value that does not map onto a domain type.
  #[error("invalid stored value: {0}")]
  Decode(String),

  #[error("settings row is missing")]
  MissingSettings,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
