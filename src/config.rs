//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{CACHE_TTL_SECS, MAX_CACHE_SIZE, REFRESH_INTERVAL_SECS, SHUTDOWN_GRACE_SECS};
use crate::error::WeatherError;

// == Mode ==
/// How a client keeps its cached cities up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Data is fetched only when a caller asks for a stale or missing city
    OnDemand,
    /// Every cached city is re-fetched in the background on a fixed period
    Polling,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::OnDemand => "on_demand",
            Mode::Polling => "polling",
        }
    }

    /// Parses a mode that may be missing, as found in request bodies.
    ///
    /// A missing or blank mode is an invalid argument.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self, WeatherError> {
        match raw.map(str::trim) {
            None | Some("") => Err(WeatherError::InvalidArgument(
                "Mode must be specified".to_string(),
            )),
            Some(raw) => raw.parse(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "on_demand" | "ondemand" => Ok(Mode::OnDemand),
            "polling" => Ok(Mode::Polling),
            other => Err(WeatherError::InvalidArgument(format!(
                "Unknown mode '{}', expected 'on_demand' or 'polling'",
                other
            ))),
        }
    }
}

// == Cache Config ==
/// Per-client cache parameters, fixed for the lifetime of a registry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of cities cached per client
    pub capacity: usize,
    /// Freshness window in seconds
    pub ttl_secs: u64,
    /// Period of the background refresh loop
    pub refresh_interval: Duration,
    /// How long a stopping refresh loop may take before it is aborted
    pub shutdown_grace: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_CACHE_SIZE,
            ttl_secs: CACHE_TTL_SECS,
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            shutdown_grace: Duration::from_secs(SHUTDOWN_GRACE_SECS),
        }
    }
}

// == Config ==
/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential registered at startup and used when a request carries none
    pub default_api_key: Option<String>,
    /// Mode of the client registered for `default_api_key` at startup
    pub mode: Mode,
    /// HTTP server port
    pub server_port: u16,
    /// Maximum cities per client
    pub cache_capacity: usize,
    /// Freshness window in seconds
    pub cache_ttl: u64,
    /// Background refresh interval in seconds
    pub refresh_interval: u64,
    /// Grace period in seconds for stopping a refresh loop
    pub shutdown_grace: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `OPENWEATHER_API_KEY` - Default credential (default: none)
    /// - `WEATHER_MODE` - `on_demand` or `polling` (default: on_demand)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_CAPACITY` - Cities per client (default: 10)
    /// - `CACHE_TTL` - Freshness window in seconds (default: 600)
    /// - `REFRESH_INTERVAL` - Refresh period in seconds (default: 300)
    /// - `SHUTDOWN_GRACE` - Refresh loop stop grace in seconds (default: 5)
    ///
    /// # Errors
    /// `InvalidArgument` if `WEATHER_MODE` is set but blank or unknown.
    pub fn from_env() -> Result<Self, WeatherError> {
        let defaults = Self::default();
        Ok(Self {
            default_api_key: env::var("OPENWEATHER_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            mode: mode_or_default(env::var("WEATHER_MODE").ok().as_deref(), defaults.mode)?,
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            refresh_interval: parse_var("REFRESH_INTERVAL").unwrap_or(defaults.refresh_interval),
            shutdown_grace: parse_var("SHUTDOWN_GRACE").unwrap_or(defaults.shutdown_grace),
        })
    }

    /// Cache parameters handed to the registry.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.cache_capacity,
            ttl_secs: self.cache_ttl,
            refresh_interval: Duration::from_secs(self.refresh_interval.max(1)),
            shutdown_grace: Duration::from_secs(self.shutdown_grace),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_api_key: None,
            mode: Mode::OnDemand,
            server_port: 3000,
            cache_capacity: MAX_CACHE_SIZE,
            cache_ttl: CACHE_TTL_SECS,
            refresh_interval: REFRESH_INTERVAL_SECS,
            shutdown_grace: SHUTDOWN_GRACE_SECS,
        }
    }
}

/// An unset mode falls back to `default`; a set one must parse.
fn mode_or_default(raw: Option<&str>, default: Mode) -> Result<Mode, WeatherError> {
    match raw {
        None => Ok(default),
        Some(raw) => Mode::parse_optional(Some(raw)),
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
