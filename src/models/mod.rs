//! Request and Response models for the math service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::HistoryQuery;
pub use responses::{
    CacheInfoResponse, CacheStatsResponse, ClearCacheResponse, ClearOperationCacheResponse,
    ErrorResponse, HealthResponse, MathResponse, OperationStatsResponse, SampleKey,
};
