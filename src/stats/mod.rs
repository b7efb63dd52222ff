//! Stats Module
//!
//! Per-operation request statistics.

mod aggregator;

pub use aggregator::{OperationStat, StatsAggregator};
