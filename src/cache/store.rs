//! Cache Store Module
//!
//! Bounded keyed cache combining entry storage, display names and LRU tracking.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{normalize_key, CacheEntry, CacheStats, RecencyList};

// == Cache Store ==
/// Bounded map from normalized city key to its latest fetched entry.
///
/// The three collections always hold the same key set. They are only ever
/// mutated together through `&mut self`, so one lock around the store keeps
/// them consistent.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Original (trimmed) spelling of each key, reused when refreshing
    display_names: HashMap<String, String>,
    recency: RecencyList,
    stats: CacheStats,
    capacity: usize,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` keys.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            display_names: HashMap::new(),
            recency: RecencyList::new(),
            stats: CacheStats::new(),
            capacity: capacity.max(1),
        }
    }

    // == Lookup ==
    /// Returns the entry stored for `key`, if any, and marks it most recently used.
    ///
    /// Freshness is not judged here; stale entries are returned as well.
    pub fn lookup(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let key = normalize_key(key);
        let entry = self.entries.get(&key)?.clone();
        self.recency.touch(&key);
        Some(entry)
    }

    // == Put ==
    /// Inserts or replaces the entry for `key`.
    ///
    /// Inserting a new key into a full store first evicts the least recently
    /// used key. Replacing an existing key never evicts.
    ///
    /// # Returns
    /// The normalized key that was evicted, if any.
    pub fn put(&mut self, key: &str, original_key: &str, entry: CacheEntry<V>) -> Option<String> {
        let key = normalize_key(key);

        let mut evicted = None;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(victim) = self.recency.pop_least_recent() {
                self.entries.remove(&victim);
                self.display_names.remove(&victim);
                self.stats.record_eviction();
                debug!(key = %victim, "evicted least recently used city");
                evicted = Some(victim);
            }
        }

        self.entries.insert(key.clone(), entry);
        self.display_names
            .insert(key.clone(), original_key.trim().to_string());
        self.recency.touch(&key);

        evicted
    }

    // == Snapshot ==
    /// Point-in-time copy of the stored keys, least recently used first.
    pub fn snapshot_keys(&self) -> Vec<String> {
        self.recency.least_recent_first().map(str::to_string).collect()
    }

    /// Checks for a key without touching its recency.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    /// Original spelling recorded for a normalized key.
    pub fn original_key_of(&self, normalized_key: &str) -> Option<String> {
        self.display_names.get(normalized_key).cloned()
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.display_names.clear();
        self.recency.clear();
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert!(self.entries.len() <= self.capacity);
        assert_eq!(self.entries.len(), self.display_names.len());
        assert_eq!(self.entries.len(), self.recency.len());
        for key in self.entries.keys() {
            assert!(self.display_names.contains_key(key), "orphan entry {key}");
            assert!(self.recency.contains(key), "untracked entry {key}");
        }
    }
}
