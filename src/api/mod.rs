//! API Module
//!
//! Admin HTTP surface over the proxy's response cache.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `GET /entries` - List cached responses
//! - `DELETE /entries` - Purge the cache
//! - `DELETE /entry?url=<url>` - Evict one cached response

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
