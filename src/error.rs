//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Unified error type for the caching proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Client used a method other than GET
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Client request could not be read or parsed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request URL is not of the form http://host[:port][path]
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Origin hostname did not resolve
    #[error("Unable to resolve host: {0}")]
    Resolve(String),

    /// Origin refused or failed the connection
    #[error("Unable to connect to origin {0}: {1}")]
    Connect(String, std::io::Error),

    /// I/O failure while exchanging bytes with the origin
    #[error("Origin fetch failed: {0}")]
    Fetch(std::io::Error),

    /// Origin closed the connection without sending anything
    #[error("Empty response from origin: {0}")]
    EmptyResponse(String),

    /// Response buffer could not grow past the given capacity
    #[error("Response buffer exhausted at {0} bytes")]
    BufferExhausted(usize),

    /// Origin fetch exceeded the configured timeout
    #[error("Origin fetch timed out: {0}")]
    Timeout(String),

    /// Cached payload has no header/body separator
    #[error("Malformed cached response for {0}")]
    MalformedResponse(String),

    /// Key not present in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Retrieve was called for a key the store does not hold
    #[error("Cache desynchronized: {0} confirmed present but missing")]
    Desynchronized(String),

    /// Client socket I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProxyError {
    // == Client Status ==
    /// Status line to send back to the proxy client before closing.
    ///
    /// Fetch failures are surfaced as `502 Bad Gateway`. Protocol rejections
    /// return `None` and the connection is closed without a response.
    pub fn client_status(&self) -> Option<StatusCode> {
        match self {
            ProxyError::Fetch(_)
            | ProxyError::EmptyResponse(_)
            | ProxyError::BufferExhausted(_)
            | ProxyError::Timeout(_) => Some(StatusCode::BAD_GATEWAY),
            _ => None,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::UnsupportedMethod(_)
            | ProxyError::InvalidRequest(_)
            | ProxyError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            ProxyError::CacheFull(_) => StatusCode::SERVICE_UNAVAILABLE,
            other => other.client_status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failures_map_to_bad_gateway() {
        assert_eq!(
            ProxyError::BufferExhausted(1024).client_status(),
            Some(StatusCode::BAD_GATEWAY)
        );
        assert_eq!(
            ProxyError::Timeout("example.com:80".to_string()).client_status(),
            Some(StatusCode::BAD_GATEWAY)
        );
    }

    #[test]
    fn test_rejections_close_silently() {
        assert!(ProxyError::UnsupportedMethod("POST".to_string())
            .client_status()
            .is_none());
        assert!(ProxyError::Resolve("nowhere.invalid".to_string())
            .client_status()
            .is_none());
    }

    #[test]
    fn test_not_found_into_response() {
        let response = ProxyError::NotFound("http://a/".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
