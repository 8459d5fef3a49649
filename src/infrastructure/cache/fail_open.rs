//! Silent-degradation adapter around a strict cache client.

use super::connection_state::ConnectionState;
use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Wraps a strict [`CacheService`] so that no operation ever fails.
///
/// - While the backend is marked disconnected, reads return `Ok(None)` and
///   writes are dropped without touching the backend.
/// - Every backend error is logged and converted into a miss / no-op.
/// - Connection-class errors flip the shared [`ConnectionState`] to
///   disconnected; [`FailOpenCache::probe`] (driven periodically by
///   [`FailOpenCache::spawn_monitor`]) flips it back once the backend answers.
pub struct FailOpenCache<C> {
    inner: C,
    state: ConnectionState,
}

impl<C: CacheService> FailOpenCache<C> {
    /// Wraps a backend that has just been verified as reachable.
    pub fn new(inner: C) -> Self {
        Self::with_state(inner, ConnectionState::new(true))
    }

    pub fn with_state(inner: C, state: ConnectionState) -> Self {
        Self { inner, state }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Pings the backend and updates the connectivity flag.
    pub async fn probe(&self) -> bool {
        let healthy = self.inner.health_check().await;

        if healthy {
            if self.state.mark_connected() {
                info!("✓ Cache connected");
            }
        } else if self.state.mark_disconnected() {
            warn!("Cache not available, continuing without caching");
        }

        healthy
    }

    fn record_error(&self, operation: &str, short_code: &str, error: &CacheError) {
        warn!("Cache {} failed for {}: {}", operation, short_code, error);

        if error.is_connection() && self.state.mark_disconnected() {
            warn!("Cache marked disconnected, continuing without caching");
        }
    }
}

impl<C: CacheService + 'static> FailOpenCache<C> {
    /// Spawns a task that probes the backend every `interval`.
    ///
    /// The task holds only a weak reference and exits once the cache is dropped.
    pub fn spawn_monitor(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let Some(cache) = cache.upgrade() else {
                    debug!("Cache monitor stopped");
                    break;
                };

                if !cache.state.is_connected() {
                    debug!("Cache reconnecting...");
                }

                cache.probe().await;
            }
        })
    }
}

#[async_trait]
impl<C: CacheService> CacheService for FailOpenCache<C> {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        if !self.state.is_connected() {
            return Ok(None);
        }

        match self.inner.get_url(short_code).await {
            Ok(cached) => Ok(cached),
            Err(e) => {
                self.record_error("GET", short_code, &e);
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        if !self.state.is_connected() {
            return Ok(());
        }

        if let Err(e) = self
            .inner
            .set_url(short_code, original_url, ttl_seconds)
            .await
        {
            self.record_error("SET", short_code, &e);
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.state.is_connected()
    }

    fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::MockCacheService;

    #[tokio::test]
    async fn test_get_passes_through_hit() {
        let mut inner = MockCacheService::new();
        inner
            .expect_get_url()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));

        let cache = FailOpenCache::new(inner);

        assert_eq!(
            cache.get_url("abc1234").await.unwrap(),
            Some("https://example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_error_becomes_miss() {
        let mut inner = MockCacheService::new();
        inner
            .expect_get_url()
            .times(1)
            .returning(|_| Err(CacheError::OperationError("WRONGTYPE".to_string())));

        let cache = FailOpenCache::new(inner);

        assert_eq!(cache.get_url("abc1234").await.unwrap(), None);
        assert!(cache.state().is_connected());
    }

    #[tokio::test]
    async fn test_connection_error_marks_disconnected_and_short_circuits() {
        let mut inner = MockCacheService::new();
        inner
            .expect_get_url()
            .times(1)
            .returning(|_| Err(CacheError::ConnectionError("refused".to_string())));
        inner.expect_set_url().times(0);

        let cache = FailOpenCache::new(inner);

        assert_eq!(cache.get_url("abc1234").await.unwrap(), None);
        assert!(!cache.state().is_connected());

        // Backend is no longer touched.
        assert_eq!(cache.get_url("abc1234").await.unwrap(), None);
        assert!(cache.set_url("abc1234", "https://example.com", Some(60)).await.is_ok());
        assert!(!cache.health_check().await);
    }

    #[tokio::test]
    async fn test_set_error_is_swallowed() {
        let mut inner = MockCacheService::new();
        inner
            .expect_set_url()
            .times(1)
            .returning(|_, _, _| Err(CacheError::ConnectionError("broken pipe".to_string())));

        let cache = FailOpenCache::new(inner);

        assert!(cache.set_url("abc1234", "https://example.com", None).await.is_ok());
        assert!(!cache.state().is_connected());
    }

    #[tokio::test]
    async fn test_probe_reconnects() {
        let mut inner = MockCacheService::new();
        inner.expect_health_check().times(1).returning(|| true);
        inner
            .expect_get_url()
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));

        let cache = FailOpenCache::with_state(inner, ConnectionState::new(false));
        assert_eq!(cache.get_url("abc1234").await.unwrap(), None);

        assert!(cache.probe().await);
        assert!(cache.state().is_connected());
        assert_eq!(
            cache.get_url("abc1234").await.unwrap(),
            Some("https://example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_probe_failure_disconnects() {
        let mut inner = MockCacheService::new();
        inner.expect_health_check().times(1).returning(|| false);

        let cache = FailOpenCache::new(inner);

        assert!(!cache.probe().await);
        assert!(!cache.health_check().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_restores_connection() {
        let mut inner = MockCacheService::new();
        inner.expect_health_check().returning(|| true);

        let cache = Arc::new(FailOpenCache::with_state(inner, ConnectionState::new(false)));
        let handle = cache.spawn_monitor(Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(cache.state().is_connected());

        drop(cache);
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(handle.is_finished());
    }
}
