//! Proxy Module
//!
//! Forward HTTP proxy in front of the response cache.
//!
//! # Flow
//! - `server` reads one request per connection
//! - `request` parses the request line and target URL
//! - `pipeline` consults the cache, falling back to `fetch` on a miss

mod fetch;
mod pipeline;
mod request;
mod server;

pub use fetch::{read_growable, OriginFetcher, TcpOriginFetcher};
pub use pipeline::{CacheOutcome, ProxyPipeline, ProxyResponse};
pub use request::{OriginTarget, ProxyRequest, DEFAULT_ORIGIN_PORT};
pub use server::{handle_connection, read_request_head, serve};

// == Public Constants ==
/// Starting size of the origin response buffer; it doubles as needed
pub const INITIAL_READ_BUFFER: usize = 8 * 1024;

/// Largest client request head accepted
pub const MAX_REQUEST_HEAD_SIZE: usize = 16 * 1024;
