//! Utility functions for code generation and request handling.
//!
//! - [`code_generator`] - Deterministic short code generation and custom code validation
//! - [`url_validator`] - Long URL well-formedness checks
//! - [`extract_host`] - Host extraction from HTTP headers

pub mod code_generator;
pub mod extract_host;
pub mod url_validator;
