//! Recency Module
//!
//! Access-order bookkeeping for the city cache. The store asks it for the
//! eviction victim; it knows nothing about payloads or timestamps.

use std::collections::VecDeque;

// == Recency List ==
/// Normalized city keys ordered by last access.
///
/// The front of the deque is the most recently used key and the back is
/// the next eviction victim. Capacities are small (tens of cities), so
/// the linear scan in `touch` stays cheap.
#[derive(Debug, Default)]
pub struct RecencyList {
    keys: VecDeque<String>,
}

impl RecencyList {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Moves `key` to the most-recent position, adding it if unseen.
    pub fn touch(&mut self, key: &str) {
        match self.position(key) {
            Some(0) => {}
            Some(index) => {
                if let Some(existing) = self.keys.remove(index) {
                    self.keys.push_front(existing);
                }
            }
            None => self.keys.push_front(key.to_owned()),
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently used key.
    pub fn pop_least_recent(&mut self) -> Option<String> {
        self.keys.pop_back()
    }

    // == Ordering ==
    /// Keys from least to most recently used.
    pub fn least_recent_first(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().rev().map(String::as_str)
    }

    // == Length ==
    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    // == Contains ==
    /// Checks whether a key is tracked, without touching it.
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    // == Clear ==
    /// Forgets every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }
}
