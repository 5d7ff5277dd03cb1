//! Weather Client Module
//!
//! One client per credential: a bounded cache in front of a fetcher, plus
//! a refresh loop when the client polls.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, CacheStore, SharedStore};
use crate::config::{CacheConfig, Mode};
use crate::error::{Result, WeatherError};
use crate::fetcher::WeatherFetcher;
use crate::models::WeatherData;
use crate::tasks::RefreshScheduler;

// == Weather Client ==
/// Cached weather for one API key.
pub struct WeatherClient {
    credential: String,
    mode: Mode,
    ttl_secs: u64,
    cache: SharedStore<WeatherData>,
    fetcher: Arc<dyn WeatherFetcher>,
    refresher: Option<RefreshScheduler>,
}

impl WeatherClient {
    // == Constructor ==
    /// Creates a client and, in polling mode, starts its refresh loop.
    ///
    /// Polling clients must be created inside a tokio runtime.
    ///
    /// # Arguments
    /// * `credential` - API key the client is registered under
    /// * `mode` - Refresh strategy, fixed for the client's lifetime
    /// * `fetcher` - Upstream used for lookups and refreshes
    /// * `config` - Capacity, freshness window and refresh timing
    ///
    /// # Errors
    /// `InvalidArgument` for a blank credential, or for a polling client
    /// whose refresh interval is zero.
    pub fn new(
        credential: &str,
        mode: Mode,
        fetcher: Arc<dyn WeatherFetcher>,
        config: &CacheConfig,
    ) -> Result<Self> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(WeatherError::InvalidArgument(
                "API key cannot be empty".to_string(),
            ));
        }

        if mode == Mode::Polling && config.refresh_interval.is_zero() {
            return Err(WeatherError::InvalidArgument(
                "Refresh interval must be greater than zero".to_string(),
            ));
        }

        let cache = Arc::new(Mutex::new(CacheStore::new(config.capacity)));
        let refresher = match mode {
            Mode::Polling => Some(RefreshScheduler::spawn(
                cache.clone(),
                fetcher.clone(),
                config.refresh_interval,
                config.shutdown_grace,
            )),
            Mode::OnDemand => None,
        };

        Ok(Self {
            credential: credential.to_string(),
            mode,
            ttl_secs: config.ttl_secs,
            cache,
            fetcher,
            refresher,
        })
    }

    // == Lookup ==
    /// Returns current weather for `city`, from cache when fresh.
    ///
    /// A missing or stale entry is fetched upstream with no lock held and
    /// written back on success. Fetch failures are returned as-is and leave
    /// the cache untouched.
    pub async fn lookup(&self, city: &str) -> Result<WeatherData> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidArgument(
                "City name cannot be empty".to_string(),
            ));
        }

        {
            let mut store = self.cache.lock().await;
            match store.lookup(city) {
                Some(entry) if entry.is_fresh(self.ttl_secs) => {
                    store.stats_mut().record_hit();
                    return Ok(entry.into_payload());
                }
                _ => store.stats_mut().record_miss(),
            }
        }

        debug!(city, "Cache miss, fetching upstream");
        let data = self.fetcher.fetch(city).await?;

        self.cache
            .lock()
            .await
            .put(city, city, CacheEntry::fetched_now(data.clone()));

        Ok(data)
    }

    // == Accessors ==
    /// Number of cities currently cached.
    pub async fn size(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Snapshot of the cache counters.
    pub async fn stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    /// Refresh strategy chosen at creation.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Trimmed API key this client is registered under.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Maximum number of cached cities.
    pub async fn capacity(&self) -> usize {
        self.cache.lock().await.capacity()
    }

    /// True while a refresh loop is attached and not stopped.
    pub fn is_refreshing(&self) -> bool {
        self.refresher
            .as_ref()
            .is_some_and(RefreshScheduler::is_running)
    }

    // == Shutdown ==
    /// Stops the refresh loop and drops every cached city.
    ///
    /// Safe to call more than once. The client still answers lookups
    /// afterwards, fetching on demand.
    pub async fn shutdown(&self) {
        if let Some(refresher) = &self.refresher {
            refresher.stop().await;
        }
        self.cache.lock().await.clear();
    }
}

impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("credential", &mask_credential(&self.credential))
            .field("mode", &self.mode)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

// == Masking ==
/// Hides a credential for logs.
///
/// Only credentials longer than eight characters keep a four-character
/// prefix; shorter ones are masked entirely.
pub fn mask_credential(credential: &str) -> String {
    if credential.chars().count() <= 8 {
        return "***".to_string();
    }
    let prefix: String = credential.chars().take(4).collect();
    format!("{prefix}***")
}
