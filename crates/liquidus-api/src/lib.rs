//! JSON REST API for Liquidus.
//!
//! Exposes an axum [`Router`] backed by any [`liquidus_core::store::IntakeStore`].
//! Days are resolved in the server's local time zone. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", liquidus_api::api_router(store.clone()))
//! ```

pub mod drinks;
pub mod error;
pub mod settings;
pub mod snapshot;
pub mod summary;
pub mod types;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, put},
};
use liquidus_core::store::IntakeStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: IntakeStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Drink types
    .route("/types", get(types::list::<S>).post(types::create::<S>))
    .route("/types/{id}", delete(types::delete_one::<S>))
    .route("/types/{id}/enabled", put(types::set_enabled::<S>))
    // Drinks
    .route("/drinks", get(drinks::list::<S>).post(drinks::create::<S>))
    .route("/drinks/{id}", delete(drinks::delete_one::<S>))
    // Settings
    .route("/settings", get(settings::get::<S>))
    .route("/settings/goal", put(settings::set_goal::<S>))
    .route("/settings/units", put(settings::set_units::<S>))
    // Summaries
    .route("/summary/day", get(summary::day::<S>))
    .route("/summary/week", get(summary::week::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}
