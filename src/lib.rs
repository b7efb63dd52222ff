//! Math Service - cached mathematical operations over HTTP
//!
//! Runs power, fibonacci and factorial requests through a TTL result cache
//! with oldest-write eviction, and keeps per-operation request statistics.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod math;
pub mod models;
pub mod stats;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{MathError, ServiceError};
pub use executor::{ExecutionOutcome, Executor};
pub use tasks::spawn_cleanup_task;
