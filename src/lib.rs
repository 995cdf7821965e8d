//! Caching Proxy - A forward HTTP proxy with a bounded response cache
//!
//! Serves fresh cached GET responses with an `Age` header and evicts stale
//! entries before falling back to least-recently-used eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;

pub use api::{create_router, AppState};
pub use cache::CacheStore;
pub use config::Config;
pub use error::{ProxyError, Result};
pub use proxy::{serve, ProxyPipeline, TcpOriginFetcher};
