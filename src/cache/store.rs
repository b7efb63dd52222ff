//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with write-order tracking and
//! TTL expiration.
//!
//! Expiry is lazy: `get`, `stats` and `sample` ignore expired entries and
//! `get` removes the one it trips over. Capacity eviction prefers expired
//! entries (earliest expiry first) and otherwise drops the oldest write.
//! Reads never change eviction order.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::key::operation_of;
use crate::cache::{CacheEntry, CacheStatistics, CacheStats, WriteOrder, MAX_KEY_LENGTH};
use crate::error::CacheError;
use crate::math::Number;

// == Cache Store ==
/// Bounded result cache with absolute TTL and oldest-write eviction.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Write order for eviction
    order: WriteOrder,
    /// Hit/miss/set/eviction counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Lifetime of every entry
    ttl: Duration,
    /// Engine start, for uptime reporting
    started_at: Instant,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with capacity and TTL in seconds.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `ttl_seconds` - Lifetime of each entry
    pub fn new(max_entries: usize, ttl_seconds: u64) -> Self {
        Self::with_ttl(max_entries, Duration::from_secs(ttl_seconds))
    }

    /// Creates a new CacheStore with an arbitrary TTL.
    pub fn with_ttl(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: WriteOrder::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
            started_at: Instant::now(),
        }
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// A live entry counts as a hit. A missing or expired entry counts as a
    /// miss; the expired entry is dropped.
    pub fn get(&mut self, key: &str) -> Option<Number> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.stats.record_hit();
                debug!(key, "cache hit");
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_entry(key);
            debug!(key, "cache miss (expired)");
        } else {
            debug!(key, "cache miss");
        }
        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// Overwrites reset the entry's lifetime and count as a fresh write.
    /// Inserting a new key at capacity evicts one entry first.
    pub fn set(&mut self, key: impl Into<String>, value: Number) -> Result<(), CacheError> {
        let key = key.into();
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::KeyTooLong {
                len: key.len(),
                max: MAX_KEY_LENGTH,
            });
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.evict_one() {
                Some(evicted) => debug!(evicted = %evicted, "evicted entry to make room"),
                None => {
                    return Err(CacheError::CacheFull(
                        "Cache is full and eviction failed".to_string(),
                    ))
                }
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, self.ttl));
        self.order.record_write(&key);
        self.stats.record_set();
        debug!(key = %key, size = self.entries.len(), "cache set");

        Ok(())
    }

    // == Clear ==
    /// Removes every entry and zeroes the counters. Capacity, TTL and start
    /// time are kept.
    ///
    /// Returns the number of live entries that were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.live_len();
        self.entries.clear();
        self.order.clear();
        self.stats.reset();
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the counters and live size.
    pub fn stats(&self) -> CacheStatistics {
        CacheStatistics::new(
            &self.stats,
            self.live_len(),
            self.max_entries,
            self.ttl.as_secs(),
            self.started_at.elapsed().as_secs_f64(),
        )
    }

    // == Sample ==
    /// Returns up to `n` live entries, oldest write first.
    pub fn sample(&self, n: usize) -> Vec<(String, Number)> {
        let now = Instant::now();
        self.order
            .iter_oldest_first()
            .filter_map(|key| {
                self.entries
                    .get(key)
                    .filter(|entry| !entry.is_expired_at(now))
                    .map(|entry| (key.clone(), entry.value.clone()))
            })
            .take(n)
            .collect()
    }

    // == Invalidate Operation ==
    /// Removes every entry belonging to `operation`. Counters are untouched.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_operation(&mut self, operation: &str) -> usize {
        let keys: Vec<String> = self
            .entries
            .keys()
            .filter(|key| operation_of(key) == Some(operation))
            .cloned()
            .collect();

        for key in &keys {
            self.remove_entry(key);
            self.stats.record_delete();
        }
        keys.len()
    }

    // == Cleanup Expired ==
    /// Physically removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }
        expired_keys.len()
    }

    // == Length ==
    /// Entries physically stored, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries not yet expired.
    pub fn live_len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Eviction ==
    /// Removes one entry: the expired entry with the earliest expiry if any,
    /// else the oldest write.
    fn evict_one(&mut self) -> Option<String> {
        let now = Instant::now();
        let victim = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone())
            .or_else(|| self.order.oldest().cloned())?;

        self.remove_entry(&victim);
        self.stats.record_eviction();
        Some(victim)
    }

    fn remove_entry(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.remove(key);
    }
}
