//! Request and Response models for the admin API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing admin request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::EvictQuery;
pub use responses::{EntriesResponse, EntrySummary, EvictResponse, HealthResponse, StatsResponse};
