//! Cache Module
//!
//! Bounded in-memory caching with TTL freshness and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::Mutex;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::RecencyList;
pub use stats::CacheStats;
pub use store::CacheStore;

/// A store shared between a client and its refresh loop.
pub type SharedStore<V> = Arc<Mutex<CacheStore<V>>>;

// == Public Constants ==
/// Maximum number of cities kept per client
pub const MAX_CACHE_SIZE: usize = 10;

/// Seconds after which a cached payload is stale
pub const CACHE_TTL_SECS: u64 = 600;

/// Seconds between background refresh cycles
pub const REFRESH_INTERVAL_SECS: u64 = 300;

/// Seconds a stopping refresh loop is given before it is aborted
pub const SHUTDOWN_GRACE_SECS: u64 = 5;

// == Key Normalization ==
/// Trims surrounding whitespace and lowercases a city key.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
