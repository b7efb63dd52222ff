//! Request Context Middleware
//!
//! Tags every response with a short request id and its processing time, and
//! logs the request's start and completion.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::info;
use uuid::Uuid;

use crate::cache::round_to;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const PROCESSING_TIME_HEADER: &str = "x-processing-time-ms";

/// Generates an 8 hex character request id.
pub fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Wraps each request with id and timing headers.
///
/// A handler that already set `x-processing-time-ms` (the math routes report
/// the executor's time) keeps its value; everything else gets wall time.
pub async fn request_context(request: Request, next: Next) -> Response {
    let request_id = new_request_id();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    info!(request_id = %request_id, method = %method, path = %path, "request started");

    let mut response = next.run(request).await;
    let processing_time_ms = round_to(started.elapsed().as_secs_f64() * 1000.0, 3);

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    if !headers.contains_key(PROCESSING_TIME_HEADER) {
        if let Ok(value) = HeaderValue::from_str(&processing_time_ms.to_string()) {
            headers.insert(PROCESSING_TIME_HEADER, value);
        }
    }

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        processing_time_ms,
        "request completed"
    );

    response
}
