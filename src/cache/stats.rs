//! Cache Statistics Module
//!
//! Tracks cache counters and produces read-only snapshots.

use serde::Serialize;

// == Cache Stats ==
/// Monotonic counters owned by the cache store. Only `reset` zeroes them.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Successful insertions, overwrites included
    pub sets: u64,
    /// Entries removed to make room
    pub evictions: u64,
    /// Entries removed by explicit invalidation
    pub deletes: u64,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses) as a percentage, or 0.0 with no lookups.
    pub fn hit_rate_percent(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Cache Statistics Snapshot ==
/// Point-in-time view of the cache, as served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate_percent: f64,
    pub sets: u64,
    pub evictions: u64,
    pub deletes: u64,
    /// Live (unexpired) entries at snapshot time
    pub current_size: usize,
    pub max_size: usize,
    pub ttl_seconds: u64,
    pub uptime_seconds: f64,
}

impl CacheStatistics {
    pub fn new(
        counters: &CacheStats,
        current_size: usize,
        max_size: usize,
        ttl_seconds: u64,
        uptime_seconds: f64,
    ) -> Self {
        Self {
            hits: counters.hits,
            misses: counters.misses,
            hit_rate_percent: round_to(counters.hit_rate_percent(), 2),
            sets: counters.sets,
            evictions: counters.evictions,
            deletes: counters.deletes,
            current_size,
            max_size,
            ttl_seconds,
            uptime_seconds: round_to(uptime_seconds, 2),
        }
    }

    /// Total lookups seen by the cache.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Rounds to a fixed number of decimal places for display.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
