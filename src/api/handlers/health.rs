//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Database reachable (`healthy`, or `degraded` when only the cache is down)
/// - **503 Service Unavailable**: Database unreachable
///
/// The cache never makes the service unavailable; without it every lookup
/// goes to the database.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let cache = check_cache(&state).await;

    let db_ok = database.status == "ok";
    let cache_ok = cache.status != "error";

    let status = match (db_ok, cache_ok) {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database, cache },
    };

    if db_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks database connectivity.
async fn check_database(state: &AppState) -> CheckStatus {
    match state.url_service.check_store().await {
        Ok(()) => CheckStatus::new("ok", "Connected"),
        Err(e) => CheckStatus::new("error", format!("Database error: {}", e)),
    }
}

/// Reports the cache connectivity flag.
async fn check_cache(state: &AppState) -> CheckStatus {
    if !state.cache.is_enabled() {
        return CheckStatus::new("disabled", "Caching disabled");
    }

    if state.cache.health_check().await {
        CheckStatus::new("ok", "Redis connected")
    } else {
        CheckStatus::new("error", "Redis unavailable, serving from database")
    }
}
