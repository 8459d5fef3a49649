//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`              - Short link redirect
//! - `GET  /health`              - Health check: database and cache
//! - `POST /api/shorten`         - Create a short URL
//! - `GET  /api/stats/{code}`    - Per-code statistics
//!
//! Trailing slashes are trimmed before routing, so `/api/shorten/` and
//! `/api/shorten` reach the same handler.

use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::api::routes::api_routes;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Routes and tracing, without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(tracing::layer())
}
