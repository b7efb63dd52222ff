//! Request History
//!
//! Audit trail of completed math requests. The executor never writes here;
//! the serving layer appends one record per request it answers.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::executor::ExecutionOutcome;
use crate::math::Number;

/// Largest page a history query may request.
pub const MAX_PAGE_SIZE: usize = 100;

// == Request Record ==
/// One completed request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRecord {
    /// Assigned by the log on append
    pub id: u64,
    pub operation: String,
    pub input_data: Value,
    pub result: Option<Number>,
    pub success: bool,
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub execution_time_ms: f64,
}

impl RequestRecord {
    /// Builds an unsaved record from an executor outcome and the raw input.
    pub fn from_outcome(outcome: &ExecutionOutcome, input_data: Value) -> Self {
        let (result, error_message) = match &outcome.result {
            Ok(value) => (Some(value.clone()), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            id: 0,
            operation: outcome.operation.clone(),
            input_data,
            result,
            success: outcome.is_success(),
            error_message,
            timestamp: Utc::now(),
            execution_time_ms: outcome.execution_time_ms,
        }
    }
}

// == History Page ==
/// One page of history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    /// Records matching the filter across all pages
    pub total_records: usize,
    pub page: usize,
    pub page_size: usize,
    pub requests: Vec<RequestRecord>,
}

// == Request Log Trait ==
/// Storage for request records.
pub trait RequestLog: Send + Sync {
    /// Stores a record and returns its assigned id.
    fn append(&mut self, record: RequestRecord) -> u64;

    /// Returns a 1-based page of records, newest first, optionally filtered
    /// by operation.
    fn query(&self, operation: Option<&str>, page: usize, page_size: usize) -> HistoryPage;
}

/// Request log shared between request tasks.
pub type SharedHistory = Arc<RwLock<dyn RequestLog>>;

// == In-Memory Request Log ==
/// Bounded log that drops the oldest record once full.
#[derive(Debug)]
pub struct InMemoryRequestLog {
    /// Front = newest
    records: VecDeque<RequestRecord>,
    capacity: usize,
    next_id: u64,
}

impl InMemoryRequestLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
            next_id: 1,
        }
    }

    /// Wraps a new log for sharing across tasks.
    pub fn shared(capacity: usize) -> SharedHistory {
        Arc::new(RwLock::new(Self::new(capacity)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RequestLog for InMemoryRequestLog {
    fn append(&mut self, mut record: RequestRecord) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        record.id = id;

        if self.capacity == 0 {
            return id;
        }
        self.records.push_front(record);
        self.records.truncate(self.capacity);
        id
    }

    fn query(&self, operation: Option<&str>, page: usize, page_size: usize) -> HistoryPage {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let matches = |r: &&RequestRecord| operation.map_or(true, |op| r.operation == op);

        let total_records = self.records.iter().filter(matches).count();
        let requests = self
            .records
            .iter()
            .filter(matches)
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        HistoryPage {
            total_records,
            page,
            page_size,
            requests,
        }
    }
}
