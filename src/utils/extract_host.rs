//! Host extraction from HTTP request headers.

use crate::AppError;
use axum::http::{HeaderMap, header};
use serde_json::json;

/// Extracts the authority (host and optional port) from the `Host` header.
///
/// Unlike a domain lookup the port is kept, since it is needed to build a
/// short URL that resolves back to this service.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the `Host` header is missing, is not
/// valid UTF-8, or contains characters that cannot appear in an authority.
pub fn extract_host(headers: &HeaderMap) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?
        .trim();

    if host.is_empty()
        || host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@'))
    {
        return Err(AppError::bad_request(
            "Invalid Host header",
            json!({ "host": host }),
        ));
    }

    Ok(host.to_string())
}

/// Joins a base URL and a short code into the public short URL.
pub fn build_short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
