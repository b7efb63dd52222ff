//! Response DTOs for the math service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::cache::{round_to, CacheStatistics};
use crate::math::Number;
use crate::stats::OperationStat;

/// Longest sample value shown before truncation.
const SAMPLE_VALUE_LIMIT: usize = 50;

/// Response body for a math operation (POST /api/v1/math/:operation)
#[derive(Debug, Clone, Serialize)]
pub struct MathResponse {
    pub operation: String,
    /// The arguments exactly as received
    pub input_values: Value,
    pub result: Number,
    pub success: bool,
    pub from_cache: bool,
    pub execution_time_ms: f64,
}

impl MathResponse {
    pub fn new(
        operation: impl Into<String>,
        input_values: Value,
        result: Number,
        from_cache: bool,
        execution_time_ms: f64,
    ) -> Self {
        Self {
            operation: operation.into(),
            input_values,
            result,
            success: true,
            from_cache,
            execution_time_ms: round_to(execution_time_ms, 3),
        }
    }
}

/// Per-operation totals (GET /api/v1/math/stats)
#[derive(Debug, Clone, Serialize)]
pub struct OperationStatsResponse {
    pub operation: String,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Percentage, 2 decimals
    pub success_rate: f64,
    /// Milliseconds, 3 decimals
    pub avg_execution_time_ms: f64,
    pub last_updated: DateTime<Utc>,
}

impl From<&OperationStat> for OperationStatsResponse {
    fn from(stat: &OperationStat) -> Self {
        Self {
            operation: stat.operation.clone(),
            total_requests: stat.total_requests,
            successful_requests: stat.success_count,
            failed_requests: stat.failed_requests(),
            success_rate: round_to(stat.success_rate(), 2),
            avg_execution_time_ms: round_to(stat.avg_execution_time_ms(), 3),
            last_updated: stat.last_updated,
        }
    }
}

/// Response body for GET /api/v1/math/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub cache_statistics: CacheStatistics,
    pub message: String,
}

impl CacheStatsResponse {
    pub fn new(cache_statistics: CacheStatistics) -> Self {
        let message = if cache_statistics.hit_rate_percent > 50.0 {
            "Cache is performing well"
        } else {
            "Consider cache optimization"
        };
        Self {
            cache_statistics,
            message: message.to_string(),
        }
    }
}

/// One cached entry as shown by the cache info endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleKey {
    pub key: String,
    /// Rendered value, truncated for display
    pub value: String,
}

impl SampleKey {
    pub fn new(key: impl Into<String>, value: &Number) -> Self {
        Self {
            key: key.into(),
            value: truncate_for_display(&value.to_string()),
        }
    }
}

fn truncate_for_display(rendered: &str) -> String {
    if rendered.chars().count() > SAMPLE_VALUE_LIMIT {
        let head: String = rendered.chars().take(SAMPLE_VALUE_LIMIT).collect();
        format!("{}...", head)
    } else {
        rendered.to_string()
    }
}

/// Response body for GET /api/v1/math/cache/info
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfoResponse {
    pub stats: CacheStatistics,
    pub sample_keys: Vec<SampleKey>,
    pub total_keys: usize,
}

/// Response body for POST /api/v1/math/cache/clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub message: String,
    pub items_removed: usize,
    pub cache_size: usize,
}

impl ClearCacheResponse {
    pub fn new(items_removed: usize, cache_size: usize) -> Self {
        Self {
            message: "Cache cleared successfully".to_string(),
            items_removed,
            cache_size,
        }
    }
}

/// Response body for DELETE /api/v1/math/cache/:operation
#[derive(Debug, Clone, Serialize)]
pub struct ClearOperationCacheResponse {
    pub message: String,
    pub operation: String,
    pub items_removed: usize,
}

impl ClearOperationCacheResponse {
    pub fn new(operation: impl Into<String>, items_removed: usize) -> Self {
        let operation = operation.into();
        Self {
            message: format!("Cache cleared for operation '{}'", operation),
            operation,
            items_removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    pub service: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "math-service".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    pub details: Vec<String>,
    pub error_type: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::stats::StatsAggregator;
    use serde_json::json;

    fn statistics(hits: u64, misses: u64) -> CacheStatistics {
        let mut counters = CacheStats::new();
        for _ in 0..hits {
            counters.record_hit();
        }
        for _ in 0..misses {
            counters.record_miss();
        }
        CacheStatistics::new(&counters, 0, 1000, 300, 1.0)
    }

    #[test]
    fn test_math_response_serialize() {
        let resp = MathResponse::new(
            "power",
            json!({"base": 2, "exponent": 10}),
            Number::from(1024i64),
            false,
            0.12345,
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["result"], json!(1024));
        assert_eq!(json["success"], json!(true));
        assert_eq!(json["from_cache"], json!(false));
        assert_eq!(json["execution_time_ms"], json!(0.123));
        assert_eq!(json["input_values"]["exponent"], json!(10));
    }

    #[test]
    fn test_operation_stats_rounding() {
        let mut stats = StatsAggregator::new();
        stats.record("power", true, 1.0);
        stats.record("power", true, 1.0);
        stats.record("power", false, 0.0);

        let resp = OperationStatsResponse::from(stats.get("power").unwrap());
        assert_eq!(resp.total_requests, 3);
        assert_eq!(resp.successful_requests, 2);
        assert_eq!(resp.failed_requests, 1);
        assert_eq!(resp.success_rate, 66.67);
        assert_eq!(resp.avg_execution_time_ms, 0.667);
    }

    #[test]
    fn test_cache_stats_message() {
        assert_eq!(
            CacheStatsResponse::new(statistics(3, 1)).message,
            "Cache is performing well"
        );
        assert_eq!(
            CacheStatsResponse::new(statistics(1, 1)).message,
            "Consider cache optimization"
        );
        assert_eq!(
            CacheStatsResponse::new(statistics(0, 0)).message,
            "Consider cache optimization"
        );
    }

    #[test]
    fn test_sample_key_truncates_long_values() {
        let short = SampleKey::new("fibonacci(n=10)", &Number::from(55i64));
        assert_eq!(short.value, "55");

        let long_value = Number::Integer("1".repeat(80).parse().unwrap());
        let long = SampleKey::new("factorial(n=60)", &long_value);
        assert_eq!(long.value.len(), SAMPLE_VALUE_LIMIT + 3);
        assert!(long.value.ends_with("..."));
    }

    #[test]
    fn test_clear_responses() {
        let all = ClearCacheResponse::new(4, 0);
        assert_eq!(all.items_removed, 4);
        assert_eq!(all.cache_size, 0);

        let one = ClearOperationCacheResponse::new("power", 2);
        assert!(one.message.contains("power"));
        assert_eq!(one.items_removed, 2);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("math-service"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_skips_empty_context() {
        let resp = ErrorResponse {
            error: "Invalid JSON body".to_string(),
            details: vec![],
            error_type: "ValidationError".to_string(),
            success: false,
            operation: None,
            input_data: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("operation").is_none());
        assert!(json.get("input_data").is_none());
        assert_eq!(json["success"], json!(false));
    }
}
