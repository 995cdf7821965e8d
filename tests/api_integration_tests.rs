//! Integration Tests for Admin API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use caching_proxy::{
    api::create_router,
    cache::{current_timestamp_ms, CacheStore},
    AppState,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nCache-Control: max-age=60\r\nContent-Length: 5\r\n\r\nhello";

// == Helper Functions ==

fn shared_store(urls: &[&str]) -> Arc<RwLock<CacheStore>> {
    let mut store = CacheStore::new(10, 300);
    let now = current_timestamp_ms();
    for url in urls {
        store
            .insert(url.to_string(), RESPONSE.to_vec(), now)
            .unwrap();
    }
    Arc::new(RwLock::new(store))
}

fn create_test_app(cache: Arc<RwLock<CacheStore>>) -> Router {
    create_router(AppState::new(cache))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(shared_store(&[]));

    let response = app.oneshot(request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Stats ==

#[tokio::test]
async fn test_stats_reflect_store_activity() {
    let cache = shared_store(&["http://example.com/"]);
    {
        let mut store = cache.write().await;
        let now = current_timestamp_ms();
        assert!(store.contains("http://example.com/", now));
        store.retrieve("http://example.com/", now).unwrap();
        assert!(!store.contains("http://other.com/", now));
    }

    let app = create_test_app(cache);
    let response = app.oneshot(request("GET", "/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["capacity"], 10);
    assert_eq!(json["default_max_age_secs"], 300);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 0.001);
}

// == Entries ==

#[tokio::test]
async fn test_entries_lists_cached_responses() {
    let app = create_test_app(shared_store(&["http://a.com/", "http://b.com/x"]));

    let response = app.oneshot(request("GET", "/entries")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["url"], "http://a.com/");
    assert_eq!(entries[1]["url"], "http://b.com/x");
    assert_eq!(entries[0]["max_age_secs"], 60);
    assert_eq!(entries[0]["size_bytes"], RESPONSE.len());
    assert_eq!(entries[0]["fresh"], true);
}

#[tokio::test]
async fn test_entries_does_not_touch_access_times() {
    let cache = shared_store(&["http://a.com/"]);
    let before = cache.read().await.entries()[0].last_accessed_at;

    let app = create_test_app(cache.clone());
    app.oneshot(request("GET", "/entries")).await.unwrap();

    assert_eq!(cache.read().await.entries()[0].last_accessed_at, before);
}

// == Evict ==

#[tokio::test]
async fn test_evict_single_entry() {
    let cache = shared_store(&["http://a.com/", "http://b.com/"]);
    let app = create_test_app(cache.clone());

    let response = app
        .oneshot(request("DELETE", "/entry?url=http%3A%2F%2Fa.com%2F"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);

    let store = cache.read().await;
    assert_eq!(store.len(), 1);
    assert_eq!(store.entries()[0].key, "http://b.com/");
}

#[tokio::test]
async fn test_evict_unknown_url_is_not_found() {
    let app = create_test_app(shared_store(&[]));

    let response = app
        .oneshot(request("DELETE", "/entry?url=http%3A%2F%2Fmissing.com%2F"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("missing.com"));
}

#[tokio::test]
async fn test_evict_empty_url_is_bad_request() {
    let app = create_test_app(shared_store(&[]));

    let response = app.oneshot(request("DELETE", "/entry?url=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == Purge ==

#[tokio::test]
async fn test_purge_clears_store() {
    let cache = shared_store(&["http://a.com/", "http://b.com/", "http://c.com/"]);
    let app = create_test_app(cache.clone());

    let response = app.oneshot(request("DELETE", "/entries")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 3);
    assert!(cache.read().await.is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app(shared_store(&[]));

    let response = app.oneshot(request("GET", "/set")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
