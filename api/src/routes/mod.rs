//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/auth` → admin login issuing a bearer token (public)
//! - `/submissions` → submission intake, listing, download, and quota check

use crate::state::AppState;
use axum::{Router, routing::get};

pub mod auth;
pub mod health;
pub mod submissions;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth::auth_routes())
        .nest("/submissions", submissions::submissions_routes())
        .with_state(app_state)
}
