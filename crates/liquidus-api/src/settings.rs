//! Handlers for `/settings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/settings` | Goal, units and last health sync |
//! | `PUT`  | `/settings/goal` | Body: `{"daily_goal":2500}`; 400 if not positive |
//! | `PUT`  | `/settings/units` | Body: `{"units":"oz"}`; converts stored amounts |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
};
use liquidus_core::{
  goal::{GoalConfig, Settings},
  store::IntakeStore,
  units::Units,
};
use serde::Deserialize;

use crate::error::ApiError;

/// `GET /settings`
pub async fn get<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Settings>, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let settings = store.settings().await.map_err(ApiError::store)?;
  Ok(Json(settings))
}

#[derive(Debug, Deserialize)]
pub struct GoalBody {
  pub daily_goal: f64,
}

/// `PUT /settings/goal`
pub async fn set_goal<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<GoalBody>,
) -> Result<Json<Settings>, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goal = GoalConfig::new(body.daily_goal)?;
  let settings = store.set_daily_goal(goal).await.map_err(ApiError::store)?;
  Ok(Json(settings))
}

#[derive(Debug, Deserialize)]
pub struct UnitsBody {
  pub units: Units,
}

/// `PUT /settings/units`
pub async fn set_units<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<UnitsBody>,
) -> Result<Json<Settings>, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let settings = store.set_units(body.units).await.map_err(ApiError::store)?;
  Ok(Json(settings))
}
