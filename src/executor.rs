//! Operation Executor
//!
//! Runs one request through validation, cache lookup, computation, storage
//! and stats recording.
//!
//! Two concurrent misses for the same key may both compute and both store;
//! the later write wins and both are counted. There is no in-flight
//! deduplication.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStore};
use crate::error::ServiceError;
use crate::math::{Number, Operation, OperationRegistry};
use crate::stats::StatsAggregator;

/// Cache engine shared between request tasks.
pub type SharedCache = Arc<RwLock<CacheStore>>;
/// Stats aggregator shared between request tasks.
pub type SharedStats = Arc<RwLock<StatsAggregator>>;

// == Execution Outcome ==
/// What the executor hands back to the serving layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub operation: String,
    pub result: Result<Number, ServiceError>,
    /// True only when the value came from a live cache entry
    pub from_cache: bool,
    /// Lookup time on a hit, compute time on a miss, 0 on validation failure
    pub execution_time_ms: f64,
}

impl ExecutionOutcome {
    fn failed(operation: &str, error: ServiceError, execution_time_ms: f64) -> Self {
        Self {
            operation: operation.to_string(),
            result: Err(error),
            from_cache: false,
            execution_time_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

// == Executor ==
/// Orchestrates requests against an operation registry, a cache and a stats
/// aggregator. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Executor {
    registry: Arc<OperationRegistry>,
    cache: SharedCache,
    stats: SharedStats,
}

impl Executor {
    pub fn new(registry: OperationRegistry, cache: SharedCache, stats: SharedStats) -> Self {
        Self {
            registry: Arc::new(registry),
            cache,
            stats,
        }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn stats(&self) -> &SharedStats {
        &self.stats
    }

    // == Execute ==
    /// Executes `operation` with a JSON object of named arguments.
    ///
    /// Unknown operations are rejected without touching the cache or stats.
    /// Every other request is recorded in the stats aggregator exactly once.
    pub async fn execute(&self, operation: &str, input: &Value) -> ExecutionOutcome {
        let Some(handler) = self.registry.get(operation) else {
            debug!(operation, "unknown operation");
            return ExecutionOutcome::failed(
                operation,
                ServiceError::UnknownOperation(operation.to_string()),
                0.0,
            );
        };

        let outcome = self.run(handler.as_ref(), operation, input).await;

        // Recording
        self.stats.write().await.record(
            operation,
            outcome.is_success(),
            outcome.execution_time_ms,
        );

        outcome
    }

    async fn run(
        &self,
        handler: &dyn Operation,
        operation: &str,
        input: &Value,
    ) -> ExecutionOutcome {
        // Validating
        let args = match handler
            .parse_args(input)
            .and_then(|args| handler.validate(&args).map(|_| args))
        {
            Ok(args) => args,
            Err(err) => {
                debug!(operation, error = %err, "validation failed");
                return ExecutionOutcome::failed(operation, err, 0.0);
            }
        };

        // CacheLookup
        let key = CacheKey::new(operation, &args);
        let (cached, lookup_ms) = {
            let mut cache = self.cache.write().await;
            // Timed under the guard so lock contention is not reported
            let lookup_started = Instant::now();
            let cached = cache.get(key.as_str());
            (cached, elapsed_ms(lookup_started))
        };
        if let Some(value) = cached {
            return ExecutionOutcome {
                operation: operation.to_string(),
                result: Ok(value),
                from_cache: true,
                execution_time_ms: lookup_ms,
            };
        }

        // Computing
        let started = Instant::now();
        let computed = handler.compute(&args);
        let execution_time_ms = elapsed_ms(started);

        let value = match computed {
            Ok(value) => value,
            Err(err) => {
                let err = ServiceError::from_math(operation, args.to_json(), err);
                debug!(operation, error = %err, "computation failed");
                return ExecutionOutcome::failed(operation, err, execution_time_ms);
            }
        };

        // Storing: a cache failure degrades to an uncached result
        if let Err(err) = self.cache.write().await.set(key.clone(), value.clone()) {
            warn!(operation, key = %key, error = %err, "result computed but not cached");
        }

        ExecutionOutcome {
            operation: operation.to_string(),
            result: Ok(value),
            from_cache: false,
            execution_time_ms,
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use crate::math::{Operation, OperationArgs};
    use serde_json::json;

    fn executor_with(registry: OperationRegistry, cache: CacheStore) -> Executor {
        Executor::new(
            registry,
            Arc::new(RwLock::new(cache)),
            Arc::new(RwLock::new(StatsAggregator::new())),
        )
    }

    fn executor() -> Executor {
        executor_with(OperationRegistry::standard(), CacheStore::new(100, 300))
    }

    #[tokio::test]
    async fn test_power_miss_then_hit() {
        let executor = executor();

        let first = executor.execute("power", &json!({"base": 2, "exponent": 10})).await;
        assert_eq!(first.result, Ok(Number::from(1024i64)));
        assert!(!first.from_cache);

        let second = executor.execute("power", &json!({"base": 2, "exponent": 10})).await;
        assert_eq!(second.result, Ok(Number::from(1024i64)));
        assert!(second.from_cache);

        let cache = executor.cache().read().await.stats();
        assert_eq!(cache.hits, 1);
        assert_eq!(cache.misses, 1);
        assert_eq!(cache.sets, 1);

        let stats = executor.stats().read().await;
        let power = stats.get("power").unwrap();
        assert_eq!(power.total_requests, 2);
        assert_eq!(power.success_count, 2);
    }

    #[tokio::test]
    async fn test_int_and_float_args_cached_separately() {
        let executor = executor();

        executor.execute("power", &json!({"base": 2, "exponent": 3})).await;
        let float = executor.execute("power", &json!({"base": 2.0, "exponent": 3})).await;

        assert!(!float.from_cache);
        assert_eq!(float.result, Ok(Number::Float(8.0)));
    }

    #[tokio::test]
    async fn test_fibonacci_and_factorial() {
        let executor = executor();

        let fib = executor.execute("fibonacci", &json!({"n": 10})).await;
        assert_eq!(fib.result, Ok(Number::from(55i64)));

        let fact = executor.execute("factorial", &json!({"n": 5})).await;
        assert_eq!(fact.result, Ok(Number::from(120i64)));
    }

    #[tokio::test]
    async fn test_negative_fibonacci_skips_cache_and_records_failure() {
        let executor = executor();

        let outcome = executor.execute("fibonacci", &json!({"n": -1})).await;
        let err = outcome.result.unwrap_err();
        assert_eq!(err.error_type(), "DomainError");
        assert_eq!(outcome.execution_time_ms, 0.0);

        let cache = executor.cache().read().await.stats();
        assert_eq!(cache.hits + cache.misses, 0);
        assert_eq!(cache.sets, 0);

        let stats = executor.stats().read().await;
        let fib = stats.get("fibonacci").unwrap();
        assert_eq!(fib.total_requests, 1);
        assert_eq!(fib.success_count, 0);
    }

    #[tokio::test]
    async fn test_factorial_171_rejected_before_compute() {
        let executor = executor();

        let outcome = executor.execute("factorial", &json!({"n": 171})).await;
        assert_eq!(outcome.result.unwrap_err().error_type(), "ValidationError");
        assert_eq!(executor.cache().read().await.stats().misses, 0);
    }

    #[tokio::test]
    async fn test_overflow_is_reported_with_inputs() {
        let executor = executor();

        let outcome = executor
            .execute("power", &json!({"base": 1000, "exponent": 1000}))
            .await;
        match outcome.result {
            Err(ServiceError::Overflow { operation, input, .. }) => {
                assert_eq!(operation, "power");
                assert_eq!(input, json!({"base": 1000, "exponent": 1000}));
            }
            other => panic!("expected overflow, got {:?}", other),
        }

        let cache = executor.cache().read().await.stats();
        assert_eq!(cache.misses, 1);
        assert_eq!(cache.sets, 0);
        assert_eq!(executor.stats().read().await.get("power").unwrap().success_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_operation_not_recorded() {
        let executor = executor();

        let outcome = executor.execute("sqrt", &json!({"x": 4})).await;
        assert_eq!(outcome.result.unwrap_err().error_type(), "UnknownOperation");

        let cache = executor.cache().read().await.stats();
        assert_eq!(cache.hits + cache.misses, 0);
        let stats = executor.stats().read().await;
        assert!(stats.get("sqrt").is_none());
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_many_unknown_operations_leave_stats_empty() {
        let executor = executor();

        for i in 0..50 {
            executor.execute(&format!("junk{}", i), &json!({})).await;
        }
        executor.execute("cache", &json!({})).await;

        assert!(executor.stats().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_cache_but_not_stats() {
        let executor = executor();

        executor.execute("fibonacci", &json!({"n": 20})).await;
        executor.cache().write().await.clear();

        let again = executor.execute("fibonacci", &json!({"n": 20})).await;
        assert!(!again.from_cache);
        assert_eq!(
            executor.stats().read().await.get("fibonacci").unwrap().total_requests,
            2
        );
    }

    struct Constant;

    impl Operation for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }
        fn params(&self) -> &'static [&'static str] {
            &["x"]
        }
        fn validate(&self, _args: &OperationArgs) -> Result<(), ServiceError> {
            Ok(())
        }
        fn compute(&self, _args: &OperationArgs) -> Result<Number, MathError> {
            Ok(Number::from(7i64))
        }
    }

    #[tokio::test]
    async fn test_cache_failure_still_returns_result() {
        let mut registry = OperationRegistry::standard();
        registry.register(Constant);
        // Zero capacity: every set fails
        let executor = executor_with(registry, CacheStore::new(0, 300));

        let outcome = executor.execute("constant", &json!({"x": 1})).await;
        assert_eq!(outcome.result, Ok(Number::from(7i64)));
        assert!(!outcome.from_cache);
        assert_eq!(executor.stats().read().await.get("constant").unwrap().success_count, 1);
    }

    #[tokio::test]
    async fn test_hit_time_excludes_lock_wait() {
        let executor = executor();
        executor.execute("fibonacci", &json!({"n": 20})).await;

        let guard = executor.cache().write().await;
        let waiting = executor.clone();
        let handle = tokio::spawn(async move {
            waiting.execute("fibonacci", &json!({"n": 20})).await
        });
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        drop(guard);

        let outcome = handle.await.unwrap();
        assert!(outcome.from_cache);
        assert!(outcome.execution_time_ms < 50.0);
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests() {
        let executor = executor();

        let mut handles = vec![];
        for _ in 0..16 {
            let executor = executor.clone();
            handles.push(tokio::spawn(async move {
                executor.execute("factorial", &json!({"n": 100})).await
            }));
        }

        for handle in handles {
            let outcome = handle.await.unwrap();
            assert!(outcome.is_success());
        }

        let cache = executor.cache().read().await.stats();
        assert_eq!(cache.hits + cache.misses, 16);
        assert!(cache.sets >= 1);
        assert_eq!(cache.current_size, 1);
        assert_eq!(
            executor.stats().read().await.get("factorial").unwrap().total_requests,
            16
        );
    }
}
