//! HTTP layer (axum).
//!
//! Thin adapter around the core posting pipeline: webhook routing, API-key
//! auth, and outcome/error response mapping. Core failures never become
//! HTTP errors; they arrive here already folded into the posting outcome.

pub mod app;
pub mod auth;
pub mod error;
pub mod handlers;

pub use app::{build_router, serve, AppState};
