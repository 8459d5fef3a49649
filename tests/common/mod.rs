#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use snaplink::application::services::{UrlService, UrlServiceSettings};
use snaplink::domain::entities::{NewUrlRecord, UrlRecord};
use snaplink::domain::repositories::UrlRepository;
use snaplink::error::StoreError;
use snaplink::infrastructure::cache::{CacheError, CacheResult, CacheService, FailOpenCache};
use snaplink::state::AppState;

/// Record store backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    records: Mutex<HashMap<String, UrlRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, code: &str, url: &str, expires_at: Option<DateTime<Utc>>) {
        let record = UrlRecord::new(code.to_string(), url.to_string(), 0, Utc::now(), expires_at);
        self.records.lock().unwrap().insert(code.to_string(), record);
    }

    pub fn get(&self, code: &str) -> Option<UrlRecord> {
        self.records.lock().unwrap().get(code).cloned()
    }

    pub fn click_count(&self, code: &str) -> i64 {
        self.get(code).map(|r| r.click_count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Makes every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        self.check_available()?;
        Ok(self.get(code))
    }

    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        self.check_available()?;
        let mut records = self.records.lock().unwrap();

        if records.contains_key(&new_record.short_code) {
            return Err(StoreError::DuplicateKey {
                code: new_record.short_code,
            });
        }

        let record = UrlRecord::new(
            new_record.short_code.clone(),
            new_record.long_url,
            0,
            Utc::now(),
            new_record.expires_at,
        );
        records.insert(new_record.short_code, record.clone());
        Ok(record)
    }

    async fn increment_click_count(&self, code: &str) -> Result<(), StoreError> {
        self.check_available()?;
        if let Some(record) = self.records.lock().unwrap().get_mut(code) {
            record.click_count += 1;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

/// Strict cache backend that can be switched off to simulate a Redis outage.
#[derive(Default)]
pub struct FlakyCache {
    entries: Mutex<HashMap<String, String>>,
    down: AtomicBool,
}

impl FlakyCache {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn get(&self, code: &str) -> Option<String> {
        self.entries.lock().unwrap().get(code).cloned()
    }

    pub fn put(&self, code: &str, url: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(code.to_string(), url.to_string());
    }

    fn check_up(&self) -> CacheResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheService for FlakyCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        self.check_up()?;
        Ok(self.get(short_code))
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.check_up()?;
        self.put(short_code, original_url);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.check_up().is_ok()
    }
}

pub struct TestContext {
    pub state: AppState,
    pub repository: Arc<InMemoryUrlRepository>,
    pub cache: Arc<FailOpenCache<FlakyCache>>,
}

impl TestContext {
    pub fn backend(&self) -> &FlakyCache {
        self.cache.inner()
    }
}

pub fn create_test_state(base_url: Option<&str>) -> TestContext {
    let repository = Arc::new(InMemoryUrlRepository::new());
    let cache = Arc::new(FailOpenCache::new(FlakyCache::default()));

    let url_service = Arc::new(UrlService::new(
        repository.clone(),
        cache.clone(),
        UrlServiceSettings::default(),
    ));

    let state = AppState::new(url_service, cache.clone(), base_url.map(str::to_string));

    TestContext {
        state,
        repository,
        cache,
    }
}

/// Polls until the click count for `code` reaches `expected` or a second passes.
pub async fn wait_for_clicks(repository: &InMemoryUrlRepository, code: &str, expected: i64) {
    for _ in 0..100 {
        if repository.click_count(code) >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
