//! Core types and trait definitions for the Liquidus hydration tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! holds the domain model, the calendar arithmetic and the pure intake
//! aggregation used by every front end.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod calendar;
pub mod drink;
pub mod error;
pub mod goal;
pub mod health;
pub mod store;
pub mod summary;
pub mod units;

pub use error::{Error, Result};
