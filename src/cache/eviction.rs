//! Eviction Module
//!
//! Chooses which entry to drop when the cache is full.
//!
//! Stale entries always go first, in scan order. Only when every entry is
//! fresh does least-recently-used apply.

use crate::cache::CacheEntry;

// == Eviction Reason ==
/// Why an entry was selected for eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// Entry outlived its max-age
    Stale,
    /// Entry had the oldest last access among fresh entries
    LeastRecentlyUsed,
}

// == Select Victim ==
/// Returns the index of the entry to evict and the reason, or None if empty.
///
/// 1. The first stale entry in index order, regardless of its access time.
/// 2. Otherwise the entry with the smallest `last_accessed_at`. Only a
///    strictly older entry displaces the current candidate, so ties resolve
///    to the lowest index.
pub fn select_victim(entries: &[CacheEntry], now: u64) -> Option<(usize, EvictionReason)> {
    if let Some(index) = entries.iter().position(|entry| !entry.is_fresh(now)) {
        return Some((index, EvictionReason::Stale));
    }

    let mut oldest: Option<(usize, u64)> = None;
    for (index, entry) in entries.iter().enumerate() {
        match oldest {
            Some((_, best)) if entry.last_accessed_at >= best => {}
            _ => oldest = Some((index, entry.last_accessed_at)),
        }
    }

    oldest.map(|(index, _)| (index, EvictionReason::LeastRecentlyUsed))
}
