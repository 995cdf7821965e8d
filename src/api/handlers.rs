//! API Handlers
//!
//! Admin HTTP handlers for inspecting and managing the response cache.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::cache::{current_timestamp_ms, CacheStore};
use crate::error::{ProxyError, Result};
use crate::models::{
    EntriesResponse, EntrySummary, EvictQuery, EvictResponse, HealthResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Holds the same store the proxy pipeline fills, behind Arc<RwLock<>>.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache store
    pub cache: Arc<RwLock<CacheStore>>,
}

impl AppState {
    /// Creates a new AppState around an already shared store.
    pub fn new(cache: Arc<RwLock<CacheStore>>) -> Self {
        Self { cache }
    }

    /// Creates a new AppState owning a fresh store.
    pub fn from_store(store: CacheStore) -> Self {
        Self::new(Arc::new(RwLock::new(store)))
    }
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(
        &cache.stats(),
        cache.capacity(),
        cache.default_max_age(),
    ))
}

/// Handler for GET /entries
///
/// Lists cached responses without touching their access times.
pub async fn entries_handler(State(state): State<AppState>) -> Json<EntriesResponse> {
    let cache = state.cache.read().await;
    let now = current_timestamp_ms();

    Json(EntriesResponse {
        entries: cache
            .entries()
            .iter()
            .map(|entry| EntrySummary::new(entry, now))
            .collect(),
    })
}

/// Handler for DELETE /entry?url=...
///
/// Evicts one cached response regardless of freshness.
pub async fn evict_handler(
    State(state): State<AppState>,
    Query(query): Query<EvictQuery>,
) -> Result<Json<EvictResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(ProxyError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    cache.remove(&query.url)?;
    info!("Evicted {} via admin API", query.url);

    Ok(Json(EvictResponse::single(query.url)))
}

/// Handler for DELETE /entries
///
/// Drops every cached response.
pub async fn purge_handler(State(state): State<AppState>) -> Json<EvictResponse> {
    let removed = state.cache.write().await.clear();
    info!("Purged {} entries via admin API", removed);

    Json(EvictResponse::purged(removed))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok";

    async fn state_with(urls: &[&str]) -> AppState {
        let state = AppState::from_store(CacheStore::new(10, 300));
        {
            let mut cache = state.cache.write().await;
            for url in urls {
                cache
                    .insert(url.to_string(), RESPONSE.to_vec(), current_timestamp_ms())
                    .unwrap();
            }
        }
        state
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state_with(&["http://a/"]).await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.total_entries, 1);
        assert_eq!(response.capacity, 10);
        assert_eq!(response.default_max_age_secs, 300);
    }

    #[tokio::test]
    async fn test_entries_handler() {
        let state = state_with(&["http://a/", "http://b/"]).await;

        let response = entries_handler(State(state)).await;
        let urls: Vec<&str> = response.entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["http://a/", "http://b/"]);
        assert!(response.entries.iter().all(|e| e.fresh));
        assert_eq!(response.entries[0].size_bytes, RESPONSE.len());
    }

    #[tokio::test]
    async fn test_evict_handler() {
        let state = state_with(&["http://a/"]).await;

        let query = EvictQuery {
            url: "http://a/".to_string(),
        };
        let result = evict_handler(State(state.clone()), Query(query.clone())).await;
        assert!(result.is_ok());
        assert!(state.cache.read().await.is_empty());

        // Second eviction finds nothing
        let result = evict_handler(State(state), Query(query)).await;
        assert!(matches!(result, Err(ProxyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_evict_invalid_query() {
        let state = state_with(&[]).await;
        let query = EvictQuery { url: String::new() };

        let result = evict_handler(State(state), Query(query)).await;
        assert!(matches!(result, Err(ProxyError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_purge_handler() {
        let state = state_with(&["http://a/", "http://b/"]).await;

        let response = purge_handler(State(state.clone())).await;
        assert_eq!(response.removed, 2);
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
