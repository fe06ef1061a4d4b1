//! A [`HealthSource`] backed by a JSON export on disk.
//!
//! The file holds an array of samples:
//!
//! ```json
//! [{ "timestamp": "2024-03-04T08:00:00Z", "amount_ml": 250.0 }]
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use liquidus_core::health::{ExternalSample, HealthSource};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileSourceError {
  #[error("failed to read {path}: {source}")]
  Read {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

pub struct JsonFileSource {
  path: PathBuf,
}

impl JsonFileSource {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl HealthSource for JsonFileSource {
  type Error = FileSourceError;

  /// Access is granted when the export exists and is a regular file.
  async fn request_authorization(&self) -> Result<bool, Self::Error> {
    match tokio::fs::metadata(&self.path).await {
      Ok(meta) => Ok(meta.is_file()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
      Err(source) => Err(FileSourceError::Read {
        path: self.path.clone(),
        source,
      }),
    }
  }

  async fn fetch_external_samples(
    &self,
    since: Option<DateTime<Utc>>,
  ) -> Result<Vec<ExternalSample>, Self::Error> {
    let raw = tokio::fs::read(&self.path).await.map_err(|source| {
      FileSourceError::Read { path: self.path.clone(), source }
    })?;
    let mut samples: Vec<ExternalSample> =
      serde_json::from_slice(&raw).map_err(|source| FileSourceError::Parse {
        path: self.path.clone(),
        source,
      })?;

    if let Some(since) = since {
      samples.retain(|s| s.timestamp >= since);
    }
    samples.sort_by_key(|s| s.timestamp);

    tracing::debug!(path = %self.path.display(), count = samples.len(), "read health export");
    Ok(samples)
  }
}
