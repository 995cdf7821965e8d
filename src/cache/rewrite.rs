//! Response Rewriter Module
//!
//! Produces the client-facing copy of a cached response with an `Age` header.

use crate::cache::entry::find_subslice;
use crate::cache::{CacheEntry, HEADER_TERMINATOR};
use crate::error::{ProxyError, Result};

// == With Age Header ==
/// Returns a copy of the cached payload with `Age: <seconds>` appended to
/// the header block.
///
/// The stored payload is never modified, so repeated retrievals do not
/// accumulate synthesized headers. An `Age` header sent by the origin is
/// left in place.
///
/// # Errors
/// `MalformedResponse` when the payload has no CRLFCRLF separator.
pub fn with_age_header(entry: &CacheEntry, now: u64) -> Result<Vec<u8>> {
    let separator = find_subslice(&entry.payload, HEADER_TERMINATOR)
        .ok_or_else(|| ProxyError::MalformedResponse(entry.key.clone()))?;

    let age_line = format!("\r\nAge: {}", entry.age_secs(now));

    let mut rewritten = Vec::with_capacity(entry.payload_size() + age_line.len());
    rewritten.extend_from_slice(&entry.payload[..separator]);
    rewritten.extend_from_slice(age_line.as_bytes());
    rewritten.extend_from_slice(&entry.payload[separator..]);

    Ok(rewritten)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn cached(payload: &[u8], created_at: u64) -> CacheEntry {
        CacheEntry::new("http://example.com/".to_string(), payload.to_vec(), created_at, 3600)
    }

    #[test]
    fn test_age_injected_before_separator() {
        let entry = cached(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello", 1_000);

        let rewritten = with_age_header(&entry, 4_200).unwrap();
        assert_eq!(
            rewritten,
            b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nAge: 3\r\n\r\nhello".to_vec()
        );
        assert_eq!(rewritten.len(), entry.payload_size() + "\r\nAge: 3".len());
    }

    #[test]
    fn test_stored_payload_unchanged() {
        let original = b"HTTP/1.1 200 OK\r\n\r\nbody".to_vec();
        let entry = cached(&original, 0);

        with_age_header(&entry, 10_000).unwrap();
        let again = with_age_header(&entry, 20_000).unwrap();

        assert_eq!(entry.payload, original);
        assert_eq!(again, b"HTTP/1.1 200 OK\r\nAge: 20\r\n\r\nbody".to_vec());
    }

    #[test]
    fn test_body_with_blank_lines_preserved() {
        let entry = cached(b"HTTP/1.1 200 OK\r\n\r\npart1\r\n\r\npart2", 0);
        let rewritten = with_age_header(&entry, 0).unwrap();
        assert_eq!(
            rewritten,
            b"HTTP/1.1 200 OK\r\nAge: 0\r\n\r\npart1\r\n\r\npart2".to_vec()
        );
    }

    #[test]
    fn test_existing_age_header_kept() {
        let entry = cached(b"HTTP/1.1 200 OK\r\nAge: 100\r\n\r\n", 0);
        let rewritten = String::from_utf8(with_age_header(&entry, 1_000).unwrap()).unwrap();
        assert_eq!(rewritten.matches("Age: ").count(), 2);
        assert!(rewritten.contains("Age: 100\r\nAge: 1\r\n\r\n"));
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        let entry = cached(b"HTTP/1.1 200 OK\r\nContent-Length: 0", 0);
        let result = with_age_header(&entry, 0);
        assert!(matches!(result, Err(ProxyError::MalformedResponse(_))));
    }
}
