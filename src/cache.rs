//! Bounded evaluation cache.
//!
//! Maps a position's canonical hash to a score computed earlier in the same
//! turn. Scores are relative to whichever side the brain is that turn, so the
//! solver clears the cache before every top-level search.
//!
//! When full, inserting a new key evicts an arbitrary existing entry; the
//! cache trades hit rate for a hard memory bound.

use std::collections::HashMap;

/// Fixed-capacity map from position hash to score.
#[derive(Debug, Clone)]
pub struct EvalCache {
    capacity: usize,
    table: HashMap<u64, i64>,
}

impl EvalCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            table: HashMap::new(),
        }
    }

    /// Cached score for a hash, if any.
    #[inline]
    pub fn get(&self, key: u64) -> Option<i64> {
        self.table.get(&key).copied()
    }

    /// Store a score, evicting some other entry if the cache is full.
    pub fn set(&mut self, key: u64, value: i64) {
        if self.capacity == 0 {
            return;
        }
        if self.table.len() >= self.capacity && !self.table.contains_key(&key) {
            if let Some(&victim) = self.table.keys().next() {
                self.table.remove(&victim);
            }
        }
        self.table.insert(key, value);
    }

    /// Change the capacity, dropping entries until the new bound holds.
    pub fn resize(&mut self, capacity: usize) {
        if self.table.len() > capacity {
            let excess = self.table.len() - capacity;
            let victims: Vec<u64> = self.table.keys().take(excess).copied().collect();
            for key in victims {
                self.table.remove(&key);
            }
        }
        self.capacity = capacity;
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
