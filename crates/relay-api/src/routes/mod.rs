//! Route definitions

use axum::{routing::get, Router};

use crate::handlers::{health, status};
use crate::state::AppState;

/// Cached owner status, mounted under /api
///
/// Served from memory, so it is never rate limited.
pub fn self_status_routes() -> Router<AppState> {
    Router::new().route("/status", get(status::get_self_status))
}

/// Live member lookups, mounted under /api; each one may call the platform
pub fn lookup_routes() -> Router<AppState> {
    Router::new().route("/status/:user_id", get(status::get_user_status))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
