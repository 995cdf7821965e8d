//! Cache Entry Module
//!
//! Defines a single cached origin response with its freshness metadata.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::HEADER_TERMINATOR;

// == Cache Entry ==
/// One cached HTTP response plus the metadata needed to judge freshness.
///
/// Timestamps are Unix milliseconds. `max_age` is in whole seconds.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Exact request URL used as the lookup key
    pub key: String,
    /// Raw response bytes: status line, headers and body
    pub payload: Vec<u8>,
    /// Insertion timestamp
    pub created_at: u64,
    /// Timestamp of the last successful retrieval
    pub last_accessed_at: u64,
    /// Freshness lifetime in seconds
    pub max_age: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry captured at `now`.
    ///
    /// The freshness lifetime comes from the response's
    /// `Cache-Control: max-age=` directive, or `default_max_age` when absent.
    pub fn new(key: String, payload: Vec<u8>, now: u64, default_max_age: u64) -> Self {
        let max_age = parse_max_age(&payload).unwrap_or(default_max_age);

        Self {
            key,
            payload,
            created_at: now,
            last_accessed_at: now,
            max_age,
        }
    }

    // == Payload Size ==
    /// Byte length of the stored response.
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    // == Is Fresh ==
    /// Checks whether the entry is still within its freshness lifetime.
    ///
    /// Boundary condition: once exactly `max_age` seconds have elapsed the
    /// entry is stale. A stale entry never removes itself; the store does.
    pub fn is_fresh(&self, now: u64) -> bool {
        self.elapsed_ms(now) < self.max_age.saturating_mul(1000)
    }

    // == Touch ==
    /// Records a successful retrieval at `now`.
    pub fn touch(&mut self, now: u64) {
        self.last_accessed_at = now.max(self.created_at);
    }

    // == Age ==
    /// Whole seconds elapsed since the entry was cached, rounded down.
    pub fn age_secs(&self, now: u64) -> u64 {
        self.elapsed_ms(now) / 1000
    }

    fn elapsed_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }
}

// == Max-Age Parsing ==
/// Extracts the `max-age` value of a `Cache-Control` header.
///
/// The search is case-insensitive, limited to the header block, and only
/// looks for `max-age=` on the same line as the `cache-control` name.
/// Returns None when no header carries a parsable value.
pub fn parse_max_age(response: &[u8]) -> Option<u64> {
    let headers = match find_subslice(response, HEADER_TERMINATOR) {
        Some(end) => &response[..end],
        None => response,
    };
    let lowered = headers.to_ascii_lowercase();

    let mut offset = 0;
    while let Some(pos) = find_subslice(&lowered[offset..], b"cache-control") {
        let start = offset + pos;
        let line_end = find_subslice(&lowered[start..], b"\r\n")
            .map(|n| start + n)
            .unwrap_or(lowered.len());
        let line = &lowered[start..line_end];

        if let Some(directive) = find_subslice(line, b"max-age=") {
            let digits: Vec<u8> = line[directive + b"max-age=".len()..]
                .iter()
                .copied()
                .take_while(u8::is_ascii_digit)
                .collect();
            if let Some(value) = std::str::from_utf8(&digits)
                .ok()
                .and_then(|s| s.parse().ok())
            {
                return Some(value);
            }
        }
        offset = line_end;
    }

    None
}

/// Position of the first occurrence of `needle` in `haystack`.
pub(crate) fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
