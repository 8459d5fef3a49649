//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid custom code regex"));

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The original URL to shorten.
    #[serde(default)]
    #[validate(length(min = 1, message = "Long URL is required"))]
    pub long_url: String,

    /// Optional custom short code.
    #[validate(length(min = 1, max = 50))]
    #[validate(regex(path = *CUSTOM_CODE_REGEX))]
    pub custom_code: Option<String>,

    /// Optional expiry timestamp. After this time the code resolves as not found.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Created (or deduplicated) short URL.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_code: String,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}
