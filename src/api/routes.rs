//! API Routes
//!
//! Configures the Axum router with all math service endpoints.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_info_handler, cache_stats_handler, clear_cache_handler, clear_operation_cache_handler,
    execute_handler, health_handler, history_handler, stats_handler, AppState,
};
use super::middleware::request_context;

/// Prefix shared by all math endpoints.
pub const MATH_API_PREFIX: &str = "/api/v1/math";

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/v1/math/:operation` - Run a math operation
/// - `GET /api/v1/math/stats` - Per-operation request totals
/// - `GET /api/v1/math/history` - Paginated request history
/// - `GET /api/v1/math/cache/stats` - Cache statistics
/// - `GET /api/v1/math/cache/info` - Cache statistics plus sample entries
/// - `POST /api/v1/math/cache/clear` - Drop all cached results
/// - `DELETE /api/v1/math/cache/:operation` - Drop one operation's results
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Request context: `x-request-id` and `x-processing-time-ms` headers
/// - CORS: Allows any origin (the dashboard is served separately)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest(MATH_API_PREFIX, math_routes())
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(request_context))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn math_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats_handler))
        .route("/history", get(history_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache/info", get(cache_info_handler))
        .route("/cache/clear", post(clear_cache_handler))
        .route("/cache/:operation", delete(clear_operation_cache_handler))
        .route("/:operation", post(execute_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::{PROCESSING_TIME_HEADER, REQUEST_ID_HEADER};
    use crate::cache::CacheStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let cache = CacheStore::new(100, 300);
        let state = AppState::new(cache);
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert!(response.headers().contains_key(PROCESSING_TIME_HEADER));
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/math/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_operation_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/math/factorial")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"n":5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_operation_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/math/sqrt")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"x":4}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cache_clear_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/math/cache/clear")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
