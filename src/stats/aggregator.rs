//! Stats Aggregator
//!
//! Running per-operation request totals, independent of cache state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Operation Stat ==
/// Running totals for one operation name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationStat {
    pub operation: String,
    pub total_requests: u64,
    pub success_count: u64,
    pub total_execution_time_ms: f64,
    pub first_seen: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl OperationStat {
    fn new(operation: &str) -> Self {
        let now = Utc::now();
        Self {
            operation: operation.to_string(),
            total_requests: 0,
            success_count: 0,
            total_execution_time_ms: 0.0,
            first_seen: now,
            last_updated: now,
        }
    }

    pub fn failed_requests(&self) -> u64 {
        self.total_requests - self.success_count
    }

    /// Percentage of successful requests, 0 when nothing was recorded.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.success_count as f64 / self.total_requests as f64 * 100.0
        }
    }

    /// Mean execution time, 0 when nothing was recorded.
    pub fn avg_execution_time_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_execution_time_ms / self.total_requests as f64
        }
    }
}

// == Stats Aggregator ==
/// Accumulates request outcomes per operation, in first-seen order.
///
/// Totals only ever grow; there is no reset.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: Vec<OperationStat>,
    index: HashMap<String, usize>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    // == Record ==
    /// Adds one completed request to `operation`'s totals.
    ///
    /// Unknown names start a new running total. Negative or non-finite
    /// times are counted as zero.
    pub fn record(&mut self, operation: &str, success: bool, execution_time_ms: f64) {
        let idx = match self.index.get(operation) {
            Some(&idx) => idx,
            None => {
                self.stats.push(OperationStat::new(operation));
                let idx = self.stats.len() - 1;
                self.index.insert(operation.to_string(), idx);
                idx
            }
        };

        let stat = &mut self.stats[idx];
        stat.total_requests += 1;
        if success {
            stat.success_count += 1;
        }
        if execution_time_ms.is_finite() && execution_time_ms > 0.0 {
            stat.total_execution_time_ms += execution_time_ms;
        }
        stat.last_updated = Utc::now();
    }

    // == Snapshot ==
    /// One entry per operation seen, in order of first occurrence.
    pub fn snapshot(&self) -> Vec<OperationStat> {
        self.stats.clone()
    }

    pub fn get(&self, operation: &str) -> Option<&OperationStat> {
        self.index.get(operation).map(|&idx| &self.stats[idx])
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
