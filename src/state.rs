//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::infrastructure::cache::CacheService;

/// Collaborators owned by the composition root and shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    /// Same cache instance the service uses; exposed for health reporting.
    pub cache: Arc<dyn CacheService>,
    /// Public base for short URLs. `None` derives it from the `Host` header.
    pub base_url: Option<String>,
}

impl AppState {
    pub fn new(
        url_service: Arc<UrlService>,
        cache: Arc<dyn CacheService>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            url_service,
            cache,
            base_url,
        }
    }
}
