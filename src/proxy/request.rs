//! Request Parsing
//!
//! Extracts method, URL and version from a client request head, and splits
//! an absolute `http://` URL into the origin it names.

use crate::cache::MAX_URL_LENGTH;
use crate::error::{ProxyError, Result};

/// Port used when the URL does not name one
pub const DEFAULT_ORIGIN_PORT: u16 = 80;

const DEFAULT_VERSION: &str = "HTTP/1.1";

// == Proxy Request ==
/// A client request line, already validated as a proxyable GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    /// Absolute request URL, used verbatim as the cache key
    pub url: String,
    /// HTTP version token from the request line
    pub version: String,
}

impl ProxyRequest {
    // == Parse ==
    /// Parses the request line at the start of `head`.
    ///
    /// Only the first line is inspected; client headers are not forwarded.
    ///
    /// # Errors
    /// - `InvalidRequest` for an empty or truncated request line
    /// - `UnsupportedMethod` for anything but GET
    pub fn parse(head: &[u8]) -> Result<Self> {
        let line_end = head
            .iter()
            .position(|b| *b == b'\n')
            .unwrap_or(head.len());
        let line = std::str::from_utf8(&head[..line_end])
            .map_err(|_| ProxyError::InvalidRequest("request line is not UTF-8".to_string()))?;

        let mut parts = line.split_whitespace();
        let method = parts
            .next()
            .ok_or_else(|| ProxyError::InvalidRequest("empty request line".to_string()))?;
        if method != "GET" {
            return Err(ProxyError::UnsupportedMethod(method.to_string()));
        }

        let url = parts
            .next()
            .ok_or_else(|| ProxyError::InvalidRequest("missing request URL".to_string()))?;
        if url.len() > MAX_URL_LENGTH {
            return Err(ProxyError::InvalidRequest(format!(
                "URL exceeds maximum length of {} bytes",
                MAX_URL_LENGTH
            )));
        }
        let version = parts.next().unwrap_or(DEFAULT_VERSION);

        Ok(Self {
            url: url.to_string(),
            version: version.to_string(),
        })
    }

    /// Origin server this request should be forwarded to.
    pub fn target(&self) -> Result<OriginTarget> {
        OriginTarget::from_url(&self.url, &self.version)
    }
}

// == Origin Target ==
/// Where and what to fetch on a cache miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginTarget {
    pub host: String,
    pub port: u16,
    /// Path and query, always starting with `/`
    pub path: String,
    pub version: String,
}

impl OriginTarget {
    // == From URL ==
    /// Splits `http://host[:port][path]`.
    ///
    /// Bracketed IPv6 literals are accepted as hosts. The scheme match is
    /// case-insensitive; anything but plain http is rejected.
    pub fn from_url(url: &str, version: &str) -> Result<Self> {
        let invalid = || ProxyError::InvalidUrl(url.to_string());

        let rest = url
            .get(..7)
            .filter(|scheme| scheme.eq_ignore_ascii_case("http://"))
            .map(|_| &url[7..])
            .ok_or_else(invalid)?;

        let (authority, path) = match rest.find(['/', '?']) {
            Some(i) if rest[i..].starts_with('/') => (&rest[..i], rest[i..].to_string()),
            Some(i) => (&rest[..i], format!("/{}", &rest[i..])),
            None => (rest, "/".to_string()),
        };

        let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
            let close = bracketed.find(']').ok_or_else(invalid)?;
            let host = &bracketed[..close];
            let port = match &bracketed[close + 1..] {
                "" => DEFAULT_ORIGIN_PORT,
                tail => tail
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(invalid)?,
            };
            (host, port)
        } else {
            match authority.rsplit_once(':') {
                Some((host, port)) => (host, port.parse().map_err(|_| invalid())?),
                None => (authority, DEFAULT_ORIGIN_PORT),
            }
        };

        if host.is_empty() || host.contains('@') {
            return Err(invalid());
        }

        Ok(Self {
            host: host.to_string(),
            port,
            path,
            version: version.to_string(),
        })
    }

    /// `host:port` form used in logs and for socket resolution.
    pub fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    // == Origin Request ==
    /// The request sent upstream. The proxy always asks the origin to close.
    pub fn origin_request(&self) -> String {
        let host_header = if self.port == DEFAULT_ORIGIN_PORT {
            self.host.clone()
        } else {
            self.authority()
        };
        format!(
            "GET {} {}\r\nHost: {}\r\nConnection: close\r\n\r\n",
            self.path, self.version, host_header
        )
    }
}
