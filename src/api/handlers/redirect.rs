//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Every successful redirect counts one click. Cache hits count it in the
/// background, so the response is not held back by the store write.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or its record has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    match state.url_service.get_long_url(&code).await? {
        Some(long_url) => Ok(Redirect::temporary(&long_url)),
        None => Err(AppError::not_found(
            "URL not found or expired",
            json!({ "code": code }),
        )),
    }
}
