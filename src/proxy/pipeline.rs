//! Proxy Pipeline
//!
//! Per-request decision logic: serve a fresh cached copy, or fetch from the
//! origin, cache the result, and return it unchanged.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{current_timestamp_ms, CacheStore};
use crate::error::{ProxyError, Result};
use crate::proxy::{OriginFetcher, ProxyRequest};

/// Whether a response came from the cache or the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

/// Bytes ready to write back to the client.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub bytes: Vec<u8>,
    pub outcome: CacheOutcome,
}

// == Proxy Pipeline ==
/// Drives the shared cache for one request at a time.
///
/// The pipeline holds no per-request state. The store lock is taken for the
/// lookup and again for the insert, never across the origin fetch.
pub struct ProxyPipeline<F> {
    cache: Arc<RwLock<CacheStore>>,
    fetcher: F,
}

impl<F: OriginFetcher> ProxyPipeline<F> {
    pub fn new(cache: Arc<RwLock<CacheStore>>, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    /// Shared store this pipeline reads and fills.
    pub fn cache(&self) -> &Arc<RwLock<CacheStore>> {
        &self.cache
    }

    // == Handle ==
    /// Produces the response for a parsed GET request.
    ///
    /// Hits are returned with an `Age` header. Misses are fetched, cached and
    /// returned exactly as the origin sent them. A response the store refuses
    /// is still returned to the client.
    ///
    /// # Errors
    /// `InvalidUrl` before any cache access, otherwise whatever the fetch
    /// reports. The store is left untouched when the fetch fails.
    pub async fn handle(&self, request: &ProxyRequest) -> Result<ProxyResponse> {
        let target = request.target()?;

        if let Some(bytes) = self.lookup(&request.url).await? {
            info!("Cache hit for {}", request.url);
            return Ok(ProxyResponse {
                bytes,
                outcome: CacheOutcome::Hit,
            });
        }

        info!(
            "Cache miss for {}, fetching from {}",
            request.url,
            target.authority()
        );
        let bytes = self.fetcher.fetch(&target).await?;

        {
            let mut cache = self.cache.write().await;
            if let Err(e) = cache.insert(request.url.clone(), bytes.clone(), current_timestamp_ms())
            {
                warn!("Response for {} not cached: {}", request.url, e);
            }
        }

        Ok(ProxyResponse {
            bytes,
            outcome: CacheOutcome::Miss,
        })
    }

    /// Returns the rewritten cached copy, or None on a miss.
    ///
    /// A cached payload that cannot be rewritten is dropped and reported as
    /// a miss so the caller refetches it.
    async fn lookup(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let mut cache = self.cache.write().await;
        let now = current_timestamp_ms();

        if !cache.contains(url, now) {
            debug!("No fresh entry for {}", url);
            return Ok(None);
        }

        match cache.retrieve(url, now) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(ProxyError::MalformedResponse(key)) => {
                match cache.discard_unreadable(&key) {
                    Some(entry) => warn!(
                        "Dropped malformed cached response for {} ({} bytes)",
                        key,
                        entry.payload_size()
                    ),
                    None => warn!("Malformed cached response for {} already gone", key),
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
