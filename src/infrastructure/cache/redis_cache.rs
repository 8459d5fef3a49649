//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Upper bound on a single Redis round trip.
const OPERATION_TIMEOUT: Duration = Duration::from_millis(500);

/// Upper bound on establishing the connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Strict Redis client for URL lookups.
///
/// The connection is opened lazily on first use and kept in a
/// `ConnectionManager`, which reconnects on its own once established. Until
/// then every call retries the initial connect, so a Redis that is down at
/// startup is picked up as soon as it answers.
///
/// Every failure is returned to the caller; wrap it in
/// [`super::FailOpenCache`] before handing it to request handling code.
pub struct RedisCache {
    client: Client,
    connection: Mutex<Option<ConnectionManager>>,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Creates a client without touching the network.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set_url`] is
    ///   called with `ttl_seconds = None`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid.
    pub fn new(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        Ok(Self {
            client,
            connection: Mutex::new(None),
            default_ttl: default_ttl_seconds,
            key_prefix: "url:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, short_code: &str) -> String {
        format!("{}{}", self.key_prefix, short_code)
    }

    /// Returns a handle to the shared connection, opening it if needed.
    async fn connection(&self) -> CacheResult<ConnectionManager> {
        let mut slot = self.connection.lock().await;

        if let Some(manager) = slot.as_ref() {
            return Ok(manager.clone());
        }

        debug!("Connecting to Redis");

        let connect = ConnectionManager::new(self.client.clone());
        let manager = tokio::time::timeout(CONNECT_TIMEOUT, connect)
            .await
            .map_err(|_| CacheError::ConnectionError("Timed out connecting to Redis".to_string()))?
            .map_err(|e| {
                CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
            })?;

        info!("✓ Connected to Redis");
        *slot = Some(manager.clone());

        Ok(manager)
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        self.run(async move { conn.ping::<()>().await }).await
    }

    /// Runs a Redis command under the operation timeout, classifying failures.
    async fn run<T, F>(&self, command: F) -> CacheResult<T>
    where
        F: Future<Output = Result<T, RedisError>>,
    {
        match tokio::time::timeout(OPERATION_TIMEOUT, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(classify(e)),
            Err(_) => Err(CacheError::ConnectionError(format!(
                "Redis command timed out after {:?}",
                OPERATION_TIMEOUT
            ))),
        }
    }
}

fn classify(e: RedisError) -> CacheError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout()
    {
        CacheError::ConnectionError(e.to_string())
    } else {
        CacheError::OperationError(e.to_string())
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(short_code);
        let mut conn = self.connection().await?;

        let cached = self
            .run(async move { conn.get::<_, Option<String>>(&key).await })
            .await?;

        match &cached {
            Some(url) => debug!("Cache HIT: {} -> {}", short_code, url),
            None => debug!("Cache MISS: {}", short_code),
        }

        Ok(cached)
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.connection().await?;
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        self.run(async move { conn.set_ex::<_, _, ()>(&key, original_url, ttl).await })
            .await?;

        debug!("Cache SET: {} -> {} (TTL: {}s)", short_code, original_url, ttl);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.ping().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{ConnectionState, FailOpenCache};

    // Nothing listens on port 1, so connecting is refused immediately or times out.
    const UNREACHABLE: &str = "redis://127.0.0.1:1/0";

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(RedisCache::new("not a redis url", 60).is_err());
    }

    #[test]
    fn test_build_key_uses_prefix() {
        let cache = RedisCache::new(UNREACHABLE, 60).unwrap();
        assert_eq!(cache.build_key("abc1234"), "url:abc1234");
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_connection_errors() {
        let cache = RedisCache::new(UNREACHABLE, 60).unwrap();

        assert!(!cache.health_check().await);

        let err = cache.get_url("abc1234").await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_unreachable_server_degrades_behind_fail_open() {
        let cache = FailOpenCache::with_state(
            RedisCache::new(UNREACHABLE, 60).unwrap(),
            ConnectionState::new(false),
        );

        assert!(!cache.probe().await);
        assert_eq!(cache.get_url("abc1234").await.unwrap(), None);
        assert!(
            cache
                .set_url("abc1234", "https://example.com", None)
                .await
                .is_ok()
        );
    }
}
