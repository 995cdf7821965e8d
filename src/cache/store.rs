//! Cache Store Module
//!
//! Bounded collection of cached responses with stale-first, then LRU, eviction.

use tracing::debug;

use crate::cache::{
    rewrite, select_victim, CacheEntry, CacheStats, EvictionReason, MAX_URL_LENGTH,
};
use crate::error::{ProxyError, Result};

// == Freshness ==
/// Result of a side-effect free lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// A fresh entry sits at this index
    Hit(usize),
    /// An entry exists at this index but has outlived its max-age
    Stale(usize),
    /// No entry for the key
    Miss,
}

// == Cache Store ==
/// Fixed-capacity response cache keyed by exact request URL.
///
/// Entries live in insertion order; removal shifts later entries left.
/// Lookup is a linear scan, which is fine for the small capacities this
/// store is meant for.
#[derive(Debug)]
pub struct CacheStore {
    /// Occupied slots in insertion order
    entries: Vec<CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Freshness lifetime in seconds for responses without max-age
    default_max_age: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the store can hold
    /// * `default_max_age` - Lifetime in seconds when a response has no max-age
    pub fn new(capacity: usize, default_max_age: u64) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            default_max_age,
        }
    }

    // == Lookup ==
    /// Index of the first entry whose key matches `url` byte for byte.
    pub fn lookup(&self, url: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == url)
    }

    // == Peek ==
    /// Classifies `url` without touching store state.
    pub fn peek(&self, url: &str, now: u64) -> Freshness {
        match self.lookup(url) {
            Some(index) if self.entries[index].is_fresh(now) => Freshness::Hit(index),
            Some(index) => Freshness::Stale(index),
            None => Freshness::Miss,
        }
    }

    // == Evict If Stale ==
    /// Removes the entry for `url` if it is stale. Returns true if removed.
    pub fn evict_if_stale(&mut self, url: &str, now: u64) -> bool {
        match self.peek(url, now) {
            Freshness::Stale(index) => {
                debug!("Evicting stale entry for {}", url);
                self.evict(index);
                self.stats.record_eviction(EvictionReason::Stale);
                true
            }
            _ => false,
        }
    }

    // == Contains ==
    /// Checks for a fresh entry, evicting a stale one as a side effect.
    ///
    /// A `false` result may have shrunk the store. Counts a miss when false.
    pub fn contains(&mut self, url: &str, now: u64) -> bool {
        if let Freshness::Hit(_) = self.peek(url, now) {
            return true;
        }
        self.evict_if_stale(url, now);
        self.stats.record_miss();
        false
    }

    // == Insert ==
    /// Caches a freshly fetched response under `url`.
    ///
    /// An existing entry with the same key is replaced. When the store is
    /// full, the eviction protocol frees one slot first.
    ///
    /// # Arguments
    /// * `url` - The exact request URL
    /// * `payload` - The complete raw origin response
    /// * `now` - Insertion timestamp in Unix milliseconds
    pub fn insert(&mut self, url: String, payload: Vec<u8>, now: u64) -> Result<()> {
        if url.len() > MAX_URL_LENGTH {
            return Err(ProxyError::InvalidRequest(format!(
                "URL exceeds maximum length of {} bytes",
                MAX_URL_LENGTH
            )));
        }

        if let Some(existing) = self.lookup(&url) {
            debug!("Replacing cached entry for {}", url);
            self.evict(existing);
        }

        if self.entries.len() >= self.capacity {
            match select_victim(&self.entries, now) {
                Some((index, reason)) => {
                    if let Some(victim) = self.evict(index) {
                        debug!("Evicted {} ({:?}) to admit {}", victim.key, reason, url);
                    }
                    self.stats.record_eviction(reason);
                }
                None => {
                    return Err(ProxyError::CacheFull(format!(
                        "No slot available for {}",
                        url
                    )));
                }
            }
        }

        let entry = CacheEntry::new(url, payload, now, self.default_max_age);
        debug!(
            "Caching {} ({} bytes, max-age {}s)",
            entry.key,
            entry.payload_size(),
            entry.max_age
        );
        self.entries.push(entry);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Retrieve ==
    /// Returns the client-facing bytes for a key `contains` just confirmed.
    ///
    /// The result is a fresh copy with an `Age` header; the stored payload
    /// is untouched. Marks the entry as accessed at `now`.
    ///
    /// # Errors
    /// - `Desynchronized` if the key is not in the store
    /// - `MalformedResponse` if the payload has no header/body separator
    pub fn retrieve(&mut self, url: &str, now: u64) -> Result<Vec<u8>> {
        let index = self
            .lookup(url)
            .ok_or_else(|| ProxyError::Desynchronized(url.to_string()))?;

        let bytes = rewrite::with_age_header(&self.entries[index], now)?;
        self.entries[index].touch(now);
        self.stats.record_hit();

        Ok(bytes)
    }

    // == Evict ==
    /// Removes the entry at `index`, shifting later entries left.
    pub fn evict(&mut self, index: usize) -> Option<CacheEntry> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        self.stats.set_total_entries(self.entries.len());
        Some(entry)
    }

    // == Remove ==
    /// Removes the entry for `url` regardless of freshness.
    pub fn remove(&mut self, url: &str) -> Result<CacheEntry> {
        self.lookup(url)
            .and_then(|index| self.evict(index))
            .ok_or_else(|| ProxyError::NotFound(url.to_string()))
    }

    // == Discard Unreadable ==
    /// Drops an entry whose payload cannot be served and counts the lookup
    /// as a miss, so `hits + misses` still matches the number of lookups.
    pub fn discard_unreadable(&mut self, url: &str) -> Option<CacheEntry> {
        self.stats.record_miss();
        self.lookup(url).and_then(|index| self.evict(index))
    }

    // == Clear ==
    /// Drops every entry. Returns how many were held.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);
        count
    }

    /// Occupied slots in scan order.
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_max_age(&self) -> u64 {
        self.default_max_age
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
