//! Core domain entities.
//!
//! - [`UrlRecord`] - A stored short code to long URL mapping with its click counter
//! - [`NewUrlRecord`] - Input for creating a record
//!
//! Entities are plain data structures; all orchestration lives in
//! [`crate::application::services`].

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
