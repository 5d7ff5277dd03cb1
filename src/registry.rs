//! Client Registry Module
//!
//! Process-scoped directory of clients, one per credential.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::client::{mask_credential, WeatherClient};
use crate::config::{CacheConfig, Mode};
use crate::error::{Result, WeatherError};
use crate::fetcher::{FetchError, OpenWeatherFetcher, WeatherFetcher};

/// Result of building a fetcher for one credential.
pub type FetcherResult = std::result::Result<Arc<dyn WeatherFetcher>, FetchError>;

/// Builds the fetcher a new client will use for its credential.
pub type FetcherFactory = Arc<dyn Fn(&str) -> FetcherResult + Send + Sync>;

// == Registry ==
/// Maps trimmed credentials to their single client.
///
/// Membership changes are serialized by the registry's own lock, which is
/// never held while a client fetches.
pub struct Registry {
    clients: Mutex<HashMap<String, Arc<WeatherClient>>>,
    config: CacheConfig,
    factory: FetcherFactory,
}

impl Registry {
    // == Constructors ==
    pub fn new(config: CacheConfig, factory: FetcherFactory) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            config,
            factory,
        }
    }

    /// Registry whose clients talk to OpenWeather with their own API key.
    pub fn openweather(config: CacheConfig) -> Self {
        Self::new(
            config,
            Arc::new(|api_key: &str| -> FetcherResult {
                let fetcher = OpenWeatherFetcher::new(api_key)?;
                Ok(Arc::new(fetcher))
            }),
        )
    }

    /// Registry whose clients all share one fetcher.
    pub fn with_fetcher(config: CacheConfig, fetcher: Arc<dyn WeatherFetcher>) -> Self {
        Self::new(
            config,
            Arc::new(move |_: &str| -> FetcherResult { Ok(fetcher.clone()) }),
        )
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Create ==
    /// Returns the client for `credential`, creating it on first use.
    ///
    /// # Errors
    /// - `InvalidArgument` if the credential is blank
    /// - `ConfigurationConflict` if a client exists with a different mode;
    ///   the existing client is left untouched
    /// - `Fetch` if no fetcher could be built for the credential
    pub async fn create(&self, credential: &str, mode: Mode) -> Result<Arc<WeatherClient>> {
        let key = normalize_credential(credential).ok_or_else(|| {
            WeatherError::InvalidArgument("API key cannot be empty".to_string())
        })?;

        let mut clients = self.clients.lock().await;

        if let Some(existing) = clients.get(key) {
            if existing.mode() != mode {
                return Err(WeatherError::ConfigurationConflict(format!(
                    "A client for this API key already exists in {} mode",
                    existing.mode()
                )));
            }
            return Ok(existing.clone());
        }

        let fetcher = (self.factory)(key)?;
        let client = Arc::new(WeatherClient::new(key, mode, fetcher, &self.config)?);
        clients.insert(key.to_string(), client.clone());

        info!(
            credential = %mask_credential(key),
            mode = %mode,
            "Registered weather client"
        );
        Ok(client)
    }

    // == Get ==
    /// Returns the registered client for `credential`, never creating one.
    pub async fn get(&self, credential: &str) -> Option<Arc<WeatherClient>> {
        let key = normalize_credential(credential)?;
        self.clients.lock().await.get(key).cloned()
    }

    // == Delete ==
    /// Unregisters the client for `credential` and shuts it down.
    ///
    /// Returns false for blank or unknown credentials. The client is removed
    /// under the registry lock; its refresh loop is stopped after the lock
    /// is released so other registry calls are not held up by the grace
    /// period.
    pub async fn delete(&self, credential: &str) -> bool {
        let Some(key) = normalize_credential(credential) else {
            return false;
        };

        let removed = self.clients.lock().await.remove(key);
        match removed {
            Some(client) => {
                client.shutdown().await;
                info!(credential = %mask_credential(key), "Deleted weather client");
                true
            }
            None => false,
        }
    }

    /// Number of registered clients.
    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }

    // == Shutdown All ==
    /// Unregisters and shuts down every client.
    pub async fn shutdown_all(&self) {
        let drained: Vec<Arc<WeatherClient>> = {
            let mut clients = self.clients.lock().await;
            clients.drain().map(|(_, client)| client).collect()
        };

        if drained.is_empty() {
            return;
        }

        warn!("Shutting down {} weather clients", drained.len());
        for client in drained {
            client.shutdown().await;
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Trims a credential; blank credentials normalize to nothing.
fn normalize_credential(credential: &str) -> Option<&str> {
    let trimmed = credential.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
