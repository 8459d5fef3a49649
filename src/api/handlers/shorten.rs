//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::validate_custom_code;
use crate::utils::extract_host::{build_short_url, extract_host};

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "longUrl": "https://example.com/a/b",
///   "customCode": "my-link",             // optional
///   "expiresAt": "2030-01-01T00:00:00Z"  // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "shortCode": "3f2a9c1",
///   "longUrl": "https://example.com/a/b",
///   "shortUrl": "https://s.example.com/3f2a9c1",
///   "createdAt": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// Re-submitting a URL without a custom code returns the existing short code.
/// That record is returned as stored: an `expiresAt` sent with the repeat
/// request is ignored.
///
/// # Errors
///
/// - 400 `validation_error` / `invalid_url` for malformed input
/// - 409 `code_taken` if the custom code is already in use
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    if let Some(code) = &payload.custom_code {
        validate_custom_code(code)?;
    }

    let base_url = match &state.base_url {
        Some(base) => base.clone(),
        None => format!("http://{}", extract_host(&headers)?),
    };

    let record = state
        .url_service
        .create_short_url_with_expiry(payload.long_url, payload.custom_code, payload.expires_at)
        .await?;

    let short_url = build_short_url(&base_url, &record.short_code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_code: record.short_code,
            long_url: record.long_url,
            short_url,
            created_at: record.created_at,
        }),
    ))
}
