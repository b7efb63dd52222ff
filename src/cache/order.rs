//! Write Order Module
//!
//! Tracks the order in which keys were last written, for oldest-write
//! eviction. Reads never touch this order; this is not an LRU.

use std::collections::VecDeque;

// == Write Order ==
/// Keys ordered by write time.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently written
/// - Back = Oldest write
#[derive(Debug, Default)]
pub struct WriteOrder {
    order: VecDeque<String>,
}

impl WriteOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Write ==
    /// Marks a key as just written (moves to front).
    ///
    /// An overwrite counts as a fresh write.
    pub fn record_write(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Oldest ==
    /// Returns the key with the oldest write without removing it.
    pub fn oldest(&self) -> Option<&String> {
        self.order.back()
    }

    /// Iterates keys from oldest to newest write.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &String> {
        self.order.iter().rev()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
