//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    /// The backend could not be reached (refused, dropped, timed out).
    ConnectionError(String),
    /// The backend was reachable but the command failed.
    OperationError(String),
}

impl CacheError {
    /// Returns true if the error means the backend is unreachable.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching `short_code -> long_url` mappings.
///
/// The cache is a latency optimisation only. Entries may vanish at any time.
///
/// Strict clients such as [`crate::infrastructure::cache::RedisCache`] report
/// every failure. [`crate::infrastructure::cache::FailOpenCache`] wraps one and
/// never returns an error, so code holding a `dyn CacheService` built by the
/// server can treat the cache as always-available.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed strict client
/// - [`crate::infrastructure::cache::FailOpenCache`] - Silent-degradation adapter
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the long URL cached for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping with an optional TTL.
    ///
    /// # Arguments
    ///
    /// - `short_code` - The short code key
    /// - `original_url` - The long URL to cache
    /// - `ttl_seconds` - TTL in seconds (implementation default if `None`)
    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is currently usable.
    async fn health_check(&self) -> bool;

    /// Returns false for implementations that never store anything.
    fn is_enabled(&self) -> bool {
        true
    }
}
