//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Requests served from the cache
    pub hits: u64,
    /// Lookups without a fresh entry
    pub misses: u64,
    /// Entries dropped for outliving their max-age
    pub stale_evictions: u64,
    /// Fresh entries dropped by LRU selection
    pub lru_evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Configured capacity
    pub capacity: usize,
    /// Lifetime in seconds for responses without a max-age
    pub default_max_age_secs: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, capacity: usize, default_max_age: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            stale_evictions: stats.stale_evictions,
            lru_evictions: stats.lru_evictions,
            total_entries: stats.total_entries,
            capacity,
            default_max_age_secs: default_max_age,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// One cached response as listed by GET /entries
#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub url: String,
    pub size_bytes: usize,
    pub age_secs: u64,
    pub max_age_secs: u64,
    pub fresh: bool,
    /// Insertion time in RFC 3339
    pub cached_at: String,
    /// Last retrieval time in RFC 3339
    pub last_accessed_at: String,
}

impl EntrySummary {
    /// Describes `entry` as seen at `now` (Unix milliseconds)
    pub fn new(entry: &CacheEntry, now: u64) -> Self {
        Self {
            url: entry.key.clone(),
            size_bytes: entry.payload_size(),
            age_secs: entry.age_secs(now),
            max_age_secs: entry.max_age,
            fresh: entry.is_fresh(now),
            cached_at: rfc3339(entry.created_at),
            last_accessed_at: rfc3339(entry.last_accessed_at),
        }
    }
}

fn rfc3339(timestamp_ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}

/// Response body for GET /entries
#[derive(Debug, Clone, Serialize)]
pub struct EntriesResponse {
    /// Entries in eviction scan order
    pub entries: Vec<EntrySummary>,
}

/// Response body for DELETE /entry and DELETE /entries
#[derive(Debug, Clone, Serialize)]
pub struct EvictResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl EvictResponse {
    /// A single URL was evicted
    pub fn single(url: impl Into<String>) -> Self {
        Self {
            message: format!("Evicted '{}'", url.into()),
            removed: 1,
        }
    }

    /// The whole cache was purged
    pub fn purged(removed: usize) -> Self {
        Self {
            message: format!("Purged {} entries", removed),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
