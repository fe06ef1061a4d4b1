//! Handlers for `/types` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/types` | Registry order |
//! | `POST`   | `/types` | Body: `{"name":"Tea"}`; returns 201 + custom type |
//! | `PUT`    | `/types/:id/enabled` | Body: `{"enabled":false}` |
//! | `DELETE` | `/types/:id` | Custom types only; deletes their records too |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use liquidus_core::{
  drink::{DrinkType, NewDrinkType, find_type},
  store::IntakeStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /types`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<DrinkType>>, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let types = store.list_drink_types().await.map_err(ApiError::store)?;
  Ok(Json(types))
}

/// `POST /types`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewDrinkType>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let existing = store.list_drink_types().await.map_err(ApiError::store)?;
  body.validate(&existing)?;

  let created = store.add_drink_type(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
pub struct EnabledBody {
  pub enabled: bool,
}

/// `PUT /types/:id/enabled`
pub async fn set_enabled<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<EnabledBody>,
) -> Result<Json<DrinkType>, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let types = store.list_drink_types().await.map_err(ApiError::store)?;
  if find_type(&types, id).is_none() {
    return Err(liquidus_core::Error::UnknownDrinkType(id).into());
  }

  let updated = store
    .set_type_enabled(id, body.enabled)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(updated))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedBody {
  /// Number of drink records removed along with the type.
  pub removed: usize,
}

/// `DELETE /types/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<DeletedBody>, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let types = store.list_drink_types().await.map_err(ApiError::store)?;
  let target = find_type(&types, id)
    .ok_or(liquidus_core::Error::UnknownDrinkType(id))?;
  if target.kind.is_default() {
    return Err(liquidus_core::Error::DefaultTypeImmutable(id).into());
  }

  let removed = store.delete_drink_type(id).await.map_err(ApiError::store)?;
  Ok(Json(DeletedBody { removed }))
}
