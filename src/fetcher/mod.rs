//! Fetcher Module
//!
//! The upstream boundary: something that turns a city name into a weather
//! payload, or fails.

mod openweather;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::WeatherData;

pub use openweather::OpenWeatherFetcher;

/// Errors an upstream fetch can end with.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The city could not be resolved
    #[error("City not found: {0}")]
    NotFound(String),

    /// The provider answered with a non-success status
    #[error("Upstream error {code}: {message}")]
    Upstream { code: u16, message: String },

    /// The fetch was interrupted before it completed
    #[error("Request was cancelled")]
    Cancelled,

    /// The request never produced a usable response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Fetches current weather for a city.
///
/// Implementations own timeouts and any retry policy; callers never retry.
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<WeatherData, FetchError>;
}
