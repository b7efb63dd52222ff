//! API Module
//!
//! HTTP handlers, middleware and routing for the math service REST API.
//!
//! # Endpoints
//! - `POST /api/v1/math/:operation` - Run a math operation
//! - `GET /api/v1/math/stats` - Per-operation request totals
//! - `GET /api/v1/math/history` - Paginated request history
//! - `GET /api/v1/math/cache/stats` - Cache statistics
//! - `GET /api/v1/math/cache/info` - Cache sample
//! - `POST /api/v1/math/cache/clear` - Drop all cached results
//! - `DELETE /api/v1/math/cache/:operation` - Drop one operation's results
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
