//! Repository trait for short URL records.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::StoreError;
use async_trait::async_trait;

/// Durable table of short code to URL records, keyed by `short_code`.
///
/// This is the source of truth. The cache layer only ever holds a
/// re-derivable projection of it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds a record by its short code.
    ///
    /// Expired records are returned as-is; interpreting `expires_at` is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Inserts a new record with `click_count = 0` and `created_at = now`.
    ///
    /// Uniqueness of `short_code` is enforced atomically by the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if the code already exists.
    /// Returns [`StoreError::Database`] on other backend errors.
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError>;

    /// Atomically adds one to the record's click counter.
    ///
    /// Incrementing an unknown code is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend errors.
    async fn increment_click_count(&self, code: &str) -> Result<(), StoreError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
