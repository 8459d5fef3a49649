//! Short code generation and validation utilities.
//!
//! Generated codes are a deterministic function of the URL text: the leading
//! hex digits of its SHA-256 digest. Custom codes supplied by clients are
//! checked for a path-safe shape here.

use crate::error::AppError;
use serde_json::json;
use sha2::{Digest, Sha256};

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Hex characters available from a SHA-256 digest.
const MAX_CODE_LENGTH: usize = 64;

/// Longest accepted custom code.
const MAX_CUSTOM_CODE_LENGTH: usize = 50;

/// Reserved codes that cannot be used as short links.
///
/// These collide with top-level routes.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// Generates the default-length short code for `url`.
///
/// # Examples
///
/// ```
/// use snaplink::utils::code_generator::generate_code;
///
/// let code = generate_code("https://example.com/a/b");
/// assert_eq!(code.len(), 7);
/// assert_eq!(code, generate_code("https://example.com/a/b"));
/// ```
pub fn generate_code(url: &str) -> String {
    generate_code_with_length(url, DEFAULT_CODE_LENGTH)
}

/// Generates a short code of `length` lowercase hex characters.
///
/// `length` is clamped to `1..=64`.
pub fn generate_code_with_length(url: &str, length: usize) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut code = hex::encode(digest);
    code.truncate(length.clamp(1, MAX_CODE_LENGTH));
    code
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 1-50 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Custom code must be 1-50 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_has_default_length() {
        assert_eq!(generate_code("https://example.com").len(), 7);
    }

    #[test]
    fn test_generate_code_is_deterministic() {
        let url = "https://example.com/some/long/path?q=1";
        assert_eq!(generate_code(url), generate_code(url));
    }

    #[test]
    fn test_generate_code_is_sha256_prefix() {
        // sha256("hello") = 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
        assert_eq!(generate_code("hello"), "2cf24db");
    }

    #[test]
    fn test_generate_code_lowercase_hex() {
        let code = generate_code("https://example.com/a/b");
        assert!(code.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_generate_code_differs_by_input() {
        assert_ne!(
            generate_code("https://example.com/a"),
            generate_code("https://example.com/b")
        );
    }

    #[test]
    fn test_generate_code_is_not_normalized() {
        assert_ne!(
            generate_code("https://example.com"),
            generate_code("https://EXAMPLE.com")
        );
    }

    #[test]
    fn test_generate_code_with_length() {
        let url = "https://example.com";
        let long = generate_code_with_length(url, 12);
        assert_eq!(long.len(), 12);
        assert!(long.starts_with(&generate_code(url)));
    }

    #[test]
    fn test_generate_code_with_length_is_clamped() {
        assert_eq!(generate_code_with_length("x", 0).len(), 1);
        assert_eq!(generate_code_with_length("x", 500).len(), 64);
    }

    #[test]
    fn test_validate_simple_code() {
        assert!(validate_custom_code("promo2025").is_ok());
        assert!(validate_custom_code("My_Link-1").is_ok());
        assert!(validate_custom_code("a").is_ok());
    }

    #[test]
    fn test_validate_empty_string() {
        assert!(validate_custom_code("").is_err());
    }

    #[test]
    fn test_validate_too_long() {
        let code = "a".repeat(51);
        let err = validate_custom_code(&code).unwrap_err();
        assert!(err.to_string().contains("1-50 characters"));
    }

    #[test]
    fn test_validate_rejects_path_characters() {
        assert!(validate_custom_code("my/code").is_err());
        assert!(validate_custom_code("my code").is_err());
        assert!(validate_custom_code("code?x=1").is_err());
    }

    #[test]
    fn test_validate_all_reserved_codes() {
        for &reserved in RESERVED_CODES {
            assert!(
                validate_custom_code(reserved).is_err(),
                "Reserved code '{}' should be invalid",
                reserved
            );
        }
        assert!(validate_custom_code("API").is_err());
    }
}
