//! Handlers for `/summary` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/summary/day`  | Optional `?date=YYYY-MM-DD`; defaults to today |
//! | `GET`  | `/summary/week` | Sunday–Saturday week containing `date` |
//!
//! A malformed `date` yields a zero-intake summary for today's period rather
//! than an error.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::Local;
use liquidus_core::{
  calendar::{DayKey, WeekRange},
  store::IntakeStore,
  summary::{IntakeSummary, TimePeriod},
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  snapshot::{Reference, Snapshot, resolve_date},
};

#[derive(Debug, Deserialize, Default)]
pub struct SummaryParams {
  pub date: Option<String>,
}

/// `GET /summary/day[?date=YYYY-MM-DD]`
pub async fn day<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SummaryParams>,
) -> Result<Json<IntakeSummary>, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  match resolve_date(params.date.as_deref()) {
    Reference::Day(day) => {
      let snapshot = Snapshot::load(store.as_ref(), day.utc_bounds(&Local)).await?;
      let settings = &snapshot.settings;
      Ok(Json(snapshot.aggregator().day_summary(
        day,
        &settings.goal,
        settings.units,
      )))
    }
    Reference::Malformed(_) => {
      let settings = store.settings().await.map_err(ApiError::store)?;
      let today = DayKey::today(&Local);
      Ok(Json(IntakeSummary::empty(
        TimePeriod::Daily,
        today,
        today,
        &settings.goal,
        settings.units,
      )))
    }
  }
}

/// `GET /summary/week[?date=YYYY-MM-DD]`
pub async fn week<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SummaryParams>,
) -> Result<Json<IntakeSummary>, ApiError>
where
  S: IntakeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  match resolve_date(params.date.as_deref()) {
    Reference::Day(day) => {
      let week = WeekRange::containing(day);
      let snapshot = Snapshot::load(store.as_ref(), week.utc_bounds(&Local)).await?;
      let settings = &snapshot.settings;
      Ok(Json(snapshot.aggregator().week_summary(
        day,
        &settings.goal,
        settings.units,
      )))
    }
    Reference::Malformed(_) => {
      let settings = store.settings().await.map_err(ApiError::store)?;
      let week = WeekRange::containing(DayKey::today(&Local));
      Ok(Json(IntakeSummary::empty(
        TimePeriod::Weekly,
        week.start,
        week.end,
        &settings.goal,
        settings.units,
      )))
    }
  }
}
