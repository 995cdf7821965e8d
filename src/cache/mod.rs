//! Cache Module
//!
//! Bounded in-memory cache of raw HTTP responses with max-age freshness,
//! stale-first then LRU eviction, and `Age` header injection on retrieval.

mod entry;
mod eviction;
mod rewrite;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, parse_max_age, CacheEntry};
pub(crate) use entry::find_subslice;
pub use eviction::{select_victim, EvictionReason};
pub use rewrite::with_age_header;
pub use stats::CacheStats;
pub use store::{CacheStore, Freshness};

// == Public Constants ==
/// Maximum allowed request URL length in bytes
pub const MAX_URL_LENGTH: usize = 2048;

/// Separator between the header block and the body of an HTTP message
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
