//! Handlers for `/drinks` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/drinks` | `?day=YYYY-MM-DD` or `?week=YYYY-MM-DD`; defaults to today |
//! | `POST`   | `/drinks` | Body: [`NewDrinkRecord`]; returns 201 + stored record |
//! | `DELETE` | `/drinks/:id` | 204, or 404 if unknown |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Local;
use liquidus_core::{
  calendar::WeekRange,
  drink::{DrinkRecord, NewDrinkRecord},
  store::IntakeStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  snapshot::{Reference, Snapshot, resolve_date},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Records of this local day.
  pub day:  Option<String>,
  /// Records of the Sunday–Saturday week containing this day. Takes
  /// precedence over `day`.
  pub week: Option<String>,
}

/// `GET /drinks[?day=...|?week=...]`: newest first, disabled types excluded.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<DrinkRecord>>, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Some(raw) = params.week.as_deref() {
    let Reference::Day(day) = resolve_date(Some(raw)) else {
      return Ok(Json(Vec::new()));
    };
    let week = WeekRange::containing(day);
    let snapshot = Snapshot::load(store.as_ref(), week.utc_bounds(&Local)).await?;
    let records = snapshot
      .aggregator()
      .filter_by_week(&week)
      .into_iter()
      .cloned()
      .collect();
    return Ok(Json(records));
  }

  let Reference::Day(day) = resolve_date(params.day.as_deref()) else {
    return Ok(Json(Vec::new()));
  };
  let snapshot = Snapshot::load(store.as_ref(), day.utc_bounds(&Local)).await?;
  let records = snapshot
    .aggregator()
    .filter_by_day(day)
    .into_iter()
    .cloned()
    .collect();
  Ok(Json(records))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /drinks`: returns 201 + the stored [`DrinkRecord`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewDrinkRecord>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let types = store.list_drink_types().await.map_err(ApiError::store)?;
  body.validate(&types)?;

  let record = store.record_drink(body).await.map_err(ApiError::store)?;
  tracing::debug!(record_id = %record.record_id, "logged drink via api");
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /drinks/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let removed = store.delete_drink(id).await.map_err(ApiError::store)?;
  if removed {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("drink {id} not found")))
  }
}
