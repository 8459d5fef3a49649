//! Handler for per-code statistics.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stored record and click count for a short code.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// Reads the record store directly; the cache and the counter are untouched.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let record = state
        .url_service
        .get_url_stats(&code)
        .await?
        .ok_or_else(|| AppError::not_found("URL not found", json!({ "code": code })))?;

    Ok(Json(record.into()))
}
