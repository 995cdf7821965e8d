//! Request DTOs for the admin API
//!
//! Defines the structure of incoming query parameters.

use serde::Deserialize;

use crate::cache::MAX_URL_LENGTH;

/// Query for evicting a single cached response (DELETE /entry?url=...)
///
/// # Fields
/// - `url`: The exact request URL the response is cached under
#[derive(Debug, Clone, Deserialize)]
pub struct EvictQuery {
    /// The cache key
    pub url: String,
}

impl EvictQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        if self.url.len() > MAX_URL_LENGTH {
            return Some(format!(
                "URL exceeds maximum length of {} bytes",
                MAX_URL_LENGTH
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evict_query_deserialize() {
        let json = r#"{"url": "http://example.com/"}"#;
        let query: EvictQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.url, "http://example.com/");
    }

    #[test]
    fn test_validate_empty_url() {
        let query = EvictQuery { url: String::new() };
        assert!(query.validate().is_some());
    }

    #[test]
    fn test_validate_valid_query() {
        let query = EvictQuery {
            url: "http://example.com/".to_string(),
        };
        assert!(query.validate().is_none());
    }
}
