//! Caching layer for fast redirect lookups.
//!
//! Provides a [`CacheService`] trait with these implementations:
//! - [`RedisCache`] - Strict Redis client that reports every failure
//! - [`FailOpenCache`] - Adapter that turns failures into misses and tracks connectivity
//! - [`NullCache`] - No-op implementation for disabled caching

mod connection_state;
mod fail_open;
mod null_cache;
mod redis_cache;
mod service;

pub use connection_state::ConnectionState;
pub use fail_open::FailOpenCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
