//! API Handlers
//!
//! HTTP request handlers for each math service endpoint.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::middleware::PROCESSING_TIME_HEADER;
use crate::cache::{round_to, CacheStore};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::executor::{Executor, SharedCache, SharedStats};
use crate::history::{HistoryPage, InMemoryRequestLog, RequestRecord, SharedHistory};
use crate::math::OperationRegistry;
use crate::models::{
    CacheInfoResponse, CacheStatsResponse, ClearCacheResponse, ClearOperationCacheResponse,
    HealthResponse, HistoryQuery, MathResponse, OperationStatsResponse, SampleKey,
};
use crate::stats::StatsAggregator;

/// Application state shared across all handlers.
///
/// The cache and stats handles are the same ones the executor writes to.
#[derive(Clone)]
pub struct AppState {
    pub executor: Executor,
    pub cache: SharedCache,
    pub stats: SharedStats,
    pub history: SharedHistory,
    /// Entries listed by the cache info endpoint
    pub sample_size: usize,
}

impl AppState {
    /// Creates a new AppState around the given cache store, with default
    /// history capacity and sample size.
    pub fn new(cache: CacheStore) -> Self {
        let defaults = Config::default();
        Self::with_parts(
            cache,
            InMemoryRequestLog::shared(defaults.history_capacity),
            defaults.sample_size,
        )
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_parts(
            CacheStore::new(config.max_entries, config.cache_ttl),
            InMemoryRequestLog::shared(config.history_capacity),
            config.sample_size,
        )
    }

    fn with_parts(cache: CacheStore, history: SharedHistory, sample_size: usize) -> Self {
        let cache = Arc::new(RwLock::new(cache));
        let stats = Arc::new(RwLock::new(StatsAggregator::new()));
        let executor = Executor::new(OperationRegistry::standard(), cache.clone(), stats.clone());
        Self {
            executor,
            cache,
            stats,
            history,
            sample_size,
        }
    }
}

/// Handler for POST /api/v1/math/:operation
///
/// Runs the operation through the executor, appends the outcome of a known
/// operation to the request history and reports the executor's time in
/// `x-processing-time-ms`.
pub async fn execute_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Response> {
    let Json(input) = body.map_err(|rejection| ServiceError::Validation {
        operation: Some(operation.clone()),
        message: "Invalid JSON body".to_string(),
        details: vec![rejection.body_text()],
    })?;

    let outcome = state.executor.execute(&operation, &input).await;
    if matches!(outcome.result, Err(ServiceError::UnknownOperation(_))) {
        return Err(ServiceError::UnknownOperation(operation));
    }
    state
        .history
        .write()
        .await
        .append(RequestRecord::from_outcome(&outcome, input.clone()));

    let timing = [(
        PROCESSING_TIME_HEADER,
        round_to(outcome.execution_time_ms, 3).to_string(),
    )];

    match outcome.result {
        Ok(result) => {
            info!(
                operation = %operation,
                result = %result,
                from_cache = outcome.from_cache,
                execution_time_ms = outcome.execution_time_ms,
                "calculation successful"
            );
            let body = MathResponse::new(
                operation,
                input,
                result,
                outcome.from_cache,
                outcome.execution_time_ms,
            );
            Ok((timing, Json(body)).into_response())
        }
        Err(err) => {
            debug!(operation = %operation, error_type = err.error_type(), error = %err, "calculation failed");
            Ok((timing, err).into_response())
        }
    }
}

/// Handler for GET /api/v1/math/stats
///
/// Returns per-operation totals in first-seen order.
pub async fn stats_handler(State(state): State<AppState>) -> Json<Vec<OperationStatsResponse>> {
    let stats = state.stats.read().await;
    Json(
        stats
            .snapshot()
            .iter()
            .map(OperationStatsResponse::from)
            .collect(),
    )
}

/// Handler for GET /api/v1/math/history
///
/// Returns one page of request records, newest first.
pub async fn history_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryPage>> {
    let Query(query) = query.map_err(|rejection| invalid_query(rejection.body_text()))?;
    if let Some(message) = query.validate() {
        return Err(invalid_query(message));
    }

    let history = state.history.read().await;
    Ok(Json(history.query(
        query.operation_filter(),
        query.page,
        query.page_size,
    )))
}

fn invalid_query(message: String) -> ServiceError {
    ServiceError::Validation {
        operation: None,
        message: "Invalid query parameters".to_string(),
        details: vec![message],
    }
}

/// Handler for GET /api/v1/math/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let stats = state.cache.read().await.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        hit_rate_percent = stats.hit_rate_percent,
        current_size = stats.current_size,
        "cache stats requested"
    );
    Json(CacheStatsResponse::new(stats))
}

/// Handler for GET /api/v1/math/cache/info
///
/// Returns cache statistics plus a sample of live entries, oldest first.
pub async fn cache_info_handler(State(state): State<AppState>) -> Json<CacheInfoResponse> {
    let cache = state.cache.read().await;
    let stats = cache.stats();
    let sample_keys = cache
        .sample(state.sample_size)
        .into_iter()
        .map(|(key, value)| SampleKey::new(key, &value))
        .collect();

    Json(CacheInfoResponse {
        total_keys: stats.current_size,
        stats,
        sample_keys,
    })
}

/// Handler for POST /api/v1/math/cache/clear
///
/// Drops every cached result and resets the cache counters. Operation stats
/// are left untouched.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let mut cache = state.cache.write().await;
    let items_removed = cache.clear();
    let cache_size = cache.live_len();

    info!(items_removed, cache_size, "cache cleared");
    Json(ClearCacheResponse::new(items_removed, cache_size))
}

/// Handler for DELETE /api/v1/math/cache/:operation
///
/// Drops only the cached results of one registered operation.
pub async fn clear_operation_cache_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ClearOperationCacheResponse>> {
    if !state.executor.registry().contains(&operation) {
        return Err(ServiceError::UnknownOperation(operation));
    }

    let items_removed = state.cache.write().await.invalidate_operation(&operation);
    info!(operation = %operation, items_removed, "operation cache cleared");
    Ok(Json(ClearOperationCacheResponse::new(operation, items_removed)))
}

/// Handler for GET /health
pub async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse::healthy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::new(CacheStore::new(100, 300))
    }

    async fn run(state: &AppState, operation: &str, input: Value) -> (StatusCode, Value) {
        let response = execute_handler(
            State(state.clone()),
            Path(operation.to_string()),
            Ok(Json(input)),
        )
        .await
        .into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_execute_handler_success_and_cache_hit() {
        let state = test_state();

        let (status, body) = run(&state, "power", json!({"base": 2, "exponent": 10})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(1024));
        assert_eq!(body["from_cache"], json!(false));

        let (_, body) = run(&state, "power", json!({"base": 2, "exponent": 10})).await;
        assert_eq!(body["from_cache"], json!(true));
    }

    #[tokio::test]
    async fn test_execute_handler_sets_processing_time() {
        let state = test_state();

        let response = execute_handler(
            State(state),
            Path("fibonacci".to_string()),
            Ok(Json(json!({"n": 10}))),
        )
        .await
        .into_response();

        assert!(response.headers().contains_key(PROCESSING_TIME_HEADER));
    }

    #[tokio::test]
    async fn test_execute_handler_domain_error() {
        let state = test_state();

        let (status, body) = run(&state, "fibonacci", json!({"n": -1})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_type"], json!("DomainError"));
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["operation"], json!("fibonacci"));
    }

    #[tokio::test]
    async fn test_execute_handler_appends_history() {
        let state = test_state();

        run(&state, "factorial", json!({"n": 5})).await;
        run(&state, "factorial", json!({"n": -3})).await;

        let Json(page) = history_handler(State(state.clone()), Ok(Query(HistoryQuery::default())))
            .await
            .unwrap();
        assert_eq!(page.total_records, 2);
        assert!(!page.requests[0].success);
        assert!(page.requests[1].success);
    }

    #[tokio::test]
    async fn test_unknown_operation_leaves_no_trace() {
        let state = test_state();

        let (status, body) = run(&state, "cache", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_type"], json!("UnknownOperation"));

        assert!(state.stats.read().await.is_empty());
        let Json(page) = history_handler(State(state), Ok(Query(HistoryQuery::default())))
            .await
            .unwrap();
        assert_eq!(page.total_records, 0);
    }

    #[tokio::test]
    async fn test_history_handler_rejects_bad_page_size() {
        let state = test_state();
        let query = HistoryQuery {
            page_size: 500,
            ..HistoryQuery::default()
        };

        let err = history_handler(State(state), Ok(Query(query))).await.unwrap_err();
        assert_eq!(err.error_type(), "ValidationError");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        run(&state, "power", json!({"base": 3, "exponent": 2})).await;
        run(&state, "fibonacci", json!({"n": 5})).await;

        let Json(stats) = stats_handler(State(state)).await;
        let names: Vec<&str> = stats.iter().map(|s| s.operation.as_str()).collect();
        assert_eq!(names, vec!["power", "fibonacci"]);
        assert_eq!(stats[0].successful_requests, 1);
    }

    #[tokio::test]
    async fn test_cache_info_and_clear() {
        let state = test_state();

        run(&state, "fibonacci", json!({"n": 10})).await;
        run(&state, "factorial", json!({"n": 5})).await;

        let Json(info) = cache_info_handler(State(state.clone())).await;
        assert_eq!(info.total_keys, 2);
        assert_eq!(info.sample_keys[0].key, "fibonacci(n=10)");
        assert_eq!(info.sample_keys[0].value, "55");

        let Json(cleared) = clear_cache_handler(State(state.clone())).await;
        assert_eq!(cleared.items_removed, 2);
        assert_eq!(cleared.cache_size, 0);

        let Json(stats) = cache_stats_handler(State(state.clone())).await;
        assert_eq!(stats.cache_statistics.sets, 0);
        assert_eq!(state.stats.read().await.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_operation_cache_handler() {
        let state = test_state();

        run(&state, "fibonacci", json!({"n": 10})).await;
        run(&state, "power", json!({"base": 2, "exponent": 2})).await;

        let Json(resp) =
            clear_operation_cache_handler(State(state.clone()), Path("fibonacci".to_string()))
                .await
                .unwrap();
        assert_eq!(resp.items_removed, 1);
        assert_eq!(state.cache.read().await.stats().current_size, 1);

        let err = clear_operation_cache_handler(State(state), Path("sqrt".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let (status, Json(resp)) = health_handler().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.status, "healthy");
    }
}
