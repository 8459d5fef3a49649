//! URL creation, resolution and stats service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::{AppError, StoreError};
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code_with_length};
use crate::utils::url_validator::validate_url;

/// Default TTL for cached `code -> url` entries.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;

/// Tunables for [`UrlService`].
#[derive(Debug, Clone)]
pub struct UrlServiceSettings {
    /// Length of generated short codes.
    pub code_length: usize,
    /// TTL applied to every cache write.
    pub cache_ttl_seconds: u64,
}

impl Default for UrlServiceSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

/// Orchestrates creation and lookup across the cache and the record store.
///
/// The store is the source of truth. The cache is consulted first on
/// resolution and written after creation or a store hit; its failures never
/// change the outcome of an operation.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    settings: UrlServiceSettings,
}

impl UrlService {
    /// Creates a new URL service.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        settings: UrlServiceSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            settings,
        }
    }

    /// Creates a short URL, or returns the existing one for a generated code.
    ///
    /// # Errors
    ///
    /// See [`Self::create_short_url_with_expiry`].
    pub async fn create_short_url(
        &self,
        long_url: String,
        custom_code: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        self.create_short_url_with_expiry(long_url, custom_code, None)
            .await
    }

    /// Creates a short URL with an optional expiry time.
    ///
    /// # Code Selection
    ///
    /// - With `custom_code`: fails with [`AppError::CodeTaken`] if a record
    ///   already uses it, including when a concurrent request wins the insert.
    /// - Without: the code is derived from the URL text. If a record already
    ///   exists under that code it is returned unchanged and nothing is written.
    ///   The stored URL is not compared with `long_url`, so a digest-prefix
    ///   collision returns the other URL's record.
    ///
    /// `expires_at` is applied only when a record is inserted. A deduplicated
    /// record keeps its stored expiry, and the requested one is ignored.
    ///
    /// The cache is populated only when a new record is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if `long_url` is not an absolute http(s) URL.
    /// Returns [`AppError::Validation`] if `expires_at` is in the past.
    /// Returns [`AppError::CodeTaken`] if the custom code already exists.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn create_short_url_with_expiry(
        &self,
        long_url: String,
        custom_code: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<UrlRecord, AppError> {
        validate_url(&long_url).map_err(|e| AppError::invalid_url(&long_url, e.to_string()))?;

        if let Some(at) = expires_at
            && at <= Utc::now()
        {
            return Err(AppError::bad_request(
                "Expiry time must be in the future",
                json!({ "expires_at": at }),
            ));
        }

        let record = match custom_code {
            Some(code) => {
                if self.repository.find_by_code(&code).await?.is_some() {
                    return Err(AppError::code_taken(code));
                }

                let new_record = NewUrlRecord::new(code, long_url).with_expiry(expires_at);
                self.repository.create(new_record).await?
            }
            None => {
                let code = generate_code_with_length(&long_url, self.settings.code_length);

                if let Some(existing) = self.repository.find_by_code(&code).await? {
                    debug!("URL already shortened as {}", code);
                    return Ok(existing);
                }

                let new_record = NewUrlRecord::new(code.clone(), long_url).with_expiry(expires_at);
                match self.repository.create(new_record).await {
                    Ok(record) => record,
                    Err(StoreError::DuplicateKey { .. }) => {
                        // Lost an insert race against an identical request.
                        return self.repository.find_by_code(&code).await?.ok_or_else(|| {
                            AppError::internal(
                                "Short code vanished after duplicate insert",
                                json!({ "code": code }),
                            )
                        });
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        metrics::counter!("snaplink_urls_created_total").increment(1);
        info!("Created short URL {} -> {}", record.short_code, record.long_url);

        self.cache_url(&record.short_code, &record.long_url).await;

        Ok(record)
    }

    /// Resolves a short code to its long URL, counting the click.
    ///
    /// # Resolution Order
    ///
    /// 1. Cache hit: the click is counted by a spawned task that is not
    ///    awaited, and the cached URL is returned. Expiry is not checked here.
    /// 2. Store miss: `Ok(None)`, no counter changes.
    /// 3. Expired record: `Ok(None)`, the record is kept and not counted.
    /// 4. Otherwise the click is counted, the mapping is cached, and the URL returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors. Cache errors are never returned.
    pub async fn get_long_url(&self, code: &str) -> Result<Option<String>, AppError> {
        match self.cache.get_url(code).await {
            Ok(Some(long_url)) => {
                metrics::counter!("snaplink_cache_hits_total").increment(1);
                self.spawn_click_increment(code);
                return Ok(Some(long_url));
            }
            Ok(None) => {}
            Err(e) => warn!("Cache lookup failed for {}: {}", code, e),
        }

        metrics::counter!("snaplink_cache_misses_total").increment(1);

        let Some(record) = self.repository.find_by_code(code).await? else {
            return Ok(None);
        };

        if record.is_expired() {
            debug!("Short code {} expired at {:?}", code, record.expires_at);
            return Ok(None);
        }

        self.repository.increment_click_count(code).await?;
        self.cache_url(code, &record.long_url).await;

        Ok(Some(record.long_url))
    }

    /// Returns the stored record for a code without touching the cache or counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_url_stats(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.repository.find_by_code(code).await?)
    }

    /// Checks that the record store is reachable.
    pub async fn check_store(&self) -> Result<(), StoreError> {
        self.repository.ping().await
    }

    async fn cache_url(&self, code: &str, long_url: &str) {
        if let Err(e) = self
            .cache
            .set_url(code, long_url, Some(self.settings.cache_ttl_seconds))
            .await
        {
            warn!("Cache write failed for {}: {}", code, e);
        }
    }

    /// Counts a click in the background. Failures are logged, never retried.
    fn spawn_click_increment(&self, code: &str) {
        let repository = Arc::clone(&self.repository);
        let code = code.to_string();

        tokio::spawn(async move {
            if let Err(e) = repository.increment_click_count(&code).await {
                metrics::counter!("snaplink_click_increment_failures_total").increment(1);
                error!("Error updating click count for {}: {}", code, e);
            }
        });
    }
}
