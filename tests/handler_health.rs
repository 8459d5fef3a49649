mod common;

use axum_test::TestServer;
use snaplink::application::services::{UrlService, UrlServiceSettings};
use snaplink::infrastructure::cache::NullCache;
use snaplink::routes::router;
use snaplink::state::AppState;
use std::sync::Arc;

#[tokio::test]
async fn test_health_all_ok() {
    let ctx = common::create_test_state(None);
    let server = TestServer::new(router(ctx.state.clone())).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_cache_down_is_degraded() {
    let ctx = common::create_test_state(None);
    let server = TestServer::new(router(ctx.state.clone())).unwrap();

    ctx.backend().set_down(true);
    ctx.cache.probe().await;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["cache"]["status"], "error");
}

#[tokio::test]
async fn test_health_database_down() {
    let ctx = common::create_test_state(None);
    let server = TestServer::new(router(ctx.state.clone())).unwrap();

    ctx.repository.set_unavailable(true);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["checks"]["database"]["status"], "error");
}

#[tokio::test]
async fn test_health_cache_disabled() {
    let repository = Arc::new(common::InMemoryUrlRepository::new());
    let cache = Arc::new(NullCache::new());
    let url_service = Arc::new(UrlService::new(
        repository,
        cache.clone(),
        UrlServiceSettings::default(),
    ));
    let state = AppState::new(url_service, cache, None);
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["cache"]["status"], "disabled");
}
