//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

use crate::cache::EvictionReason;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of requests served from the cache
    pub hits: u64,
    /// Number of lookups that found no fresh entry
    pub misses: u64,
    /// Entries removed because they outlived their max-age
    pub stale_evictions: u64,
    /// Fresh entries removed by least-recently-used selection
    pub lru_evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Evictions ==
    /// Total entries evicted for any reason.
    pub fn evictions(&self) -> u64 {
        self.stale_evictions + self.lru_evictions
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Counts an eviction under the counter for its reason.
    pub fn record_eviction(&mut self, reason: EvictionReason) {
        match reason {
            EvictionReason::Stale => self.stale_evictions += 1,
            EvictionReason::LeastRecentlyUsed => self.lru_evictions += 1,
        }
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
