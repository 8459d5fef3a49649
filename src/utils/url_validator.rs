//! Long URL well-formedness checks.

use url::Url;

/// Reasons a long URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,
    #[error("URL is too long (max {max} characters)")]
    TooLong { max: usize },
    #[error("URL must not contain whitespace or control characters")]
    InvalidCharacters,
    #[error("Invalid URL: {0}")]
    Parse(String),
    #[error("Only http/https URLs are allowed")]
    UnsupportedScheme,
    #[error("URL must have a host")]
    MissingHost,
}

/// Longest URL accepted for shortening.
pub const MAX_URL_LENGTH: usize = 2048;

/// Checks that `input` is an absolute http(s) URL with a host.
///
/// The input is only inspected, never rewritten: codes are derived from the
/// exact text the client sent. The parser would silently drop tabs and line
/// breaks, so whitespace and control characters are rejected up front; the
/// stored text is later sent verbatim as a `Location` header.
///
/// # Examples
///
/// ```
/// use snaplink::utils::url_validator::validate_url;
///
/// assert!(validate_url("https://example.com/a/b").is_ok());
/// assert!(validate_url("not a url").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong {
            max: MAX_URL_LENGTH,
        });
    }

    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlValidationError::InvalidCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::Parse(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedScheme),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
