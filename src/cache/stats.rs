//! Cache Statistics Module
//!
//! Counters for lookups, evictions and background refreshes.

use serde::Serialize;

// == Cache Stats ==
/// Running counters for one client's cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry
    pub hits: u64,
    /// Lookups that had to go upstream (absent or stale entry)
    pub misses: u64,
    /// Entries evicted due to LRU policy
    pub evictions: u64,
    /// Entries replaced by the background refresh loop
    pub refreshes: u64,
    /// Background refresh attempts that failed
    pub refresh_failures: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Recorders ==
    /// Counts a lookup answered from a fresh entry.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a lookup that went upstream.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts an LRU eviction.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Counts an entry replaced by the refresh loop.
    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    /// Counts a failed background refresh.
    pub fn record_refresh_failure(&mut self) {
        self.refresh_failures += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_refresh_counters() {
        let mut stats = CacheStats::new();
        stats.record_refresh();
        stats.record_refresh_failure();
        stats.record_refresh_failure();
        stats.record_eviction();

        assert_eq!(stats.refreshes, 1);
        assert_eq!(stats.refresh_failures, 2);
        assert_eq!(stats.evictions, 1);
    }
}
