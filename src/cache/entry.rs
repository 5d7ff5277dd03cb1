//! Cache Entry Module
//!
//! Defines the immutable pairing of a fetched payload and its fetch time.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// A fetched payload together with the moment the fetch completed.
///
/// Entries are never mutated: refreshing a key replaces its entry wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    payload: V,
    fetched_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `payload` - The fetched value
    /// * `fetched_at` - When the fetch completed
    pub fn new(payload: V, fetched_at: DateTime<Utc>) -> Self {
        Self {
            payload,
            fetched_at,
        }
    }

    /// Creates an entry stamped with the current time.
    pub fn fetched_now(payload: V) -> Self {
        Self::new(payload, Utc::now())
    }

    pub fn payload(&self) -> &V {
        &self.payload
    }

    pub fn into_payload(self) -> V {
        self.payload
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    // == Freshness ==
    /// Checks whether the entry is younger than `ttl_secs` right now.
    pub fn is_fresh(&self, ttl_secs: u64) -> bool {
        self.is_fresh_at(ttl_secs, Utc::now())
    }

    /// Checks whether the entry is younger than `ttl_secs` at `now`.
    ///
    /// Boundary condition: an entry exactly `ttl_secs` old is stale. A
    /// `fetched_at` in the future (clock skew) counts as fresh.
    pub fn is_fresh_at(&self, ttl_secs: u64, now: DateTime<Utc>) -> bool {
        match self.age_at(now).to_std() {
            Ok(age) => age < std::time::Duration::from_secs(ttl_secs),
            Err(_) => true,
        }
    }

    /// Age of the entry at `now`; negative if `fetched_at` lies in the future.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.fetched_at)
    }
}
