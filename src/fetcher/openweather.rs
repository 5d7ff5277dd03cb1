//! OpenWeather API client
//!
//! Resolves a city through the geocoding API, then fetches current weather
//! for its coordinates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{FetchError, WeatherFetcher};
use crate::models::WeatherData;

/// Geocoding endpoint
const GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";

/// Current weather endpoint (the 2.5 API works with free keys)
const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Temperatures in Celsius, wind in m/s
const UNITS: &str = "metric";

/// One match from the geocoding API
#[derive(Debug, Clone, Deserialize)]
struct GeocodingResult {
    #[serde(default)]
    name: Option<String>,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
}

/// Fetcher backed by the OpenWeather HTTP APIs, bound to one API key.
#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    client: Client,
    api_key: String,
    geocoding_url: String,
    weather_url: String,
}

impl OpenWeatherFetcher {
    /// Creates a fetcher for `api_key` against the public endpoints.
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(client, api_key))
    }

    /// Create a fetcher with a custom HTTP client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into().trim().to_string(),
            geocoding_url: GEOCODING_URL.to_string(),
            weather_url: WEATHER_URL.to_string(),
        }
    }

    /// Points the fetcher at other endpoints (proxies, test servers).
    pub fn with_base_urls(
        mut self,
        geocoding_url: impl Into<String>,
        weather_url: impl Into<String>,
    ) -> Self {
        self.geocoding_url = geocoding_url.into();
        self.weather_url = weather_url.into();
        self
    }

    async fn geocode(&self, city: &str) -> Result<GeocodingResult, FetchError> {
        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, city));
        }

        let results: Vec<GeocodingResult> = response.json().await?;
        let found = results
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound(city.to_string()))?;

        debug!(
            city,
            resolved = found.name.as_deref().unwrap_or_default(),
            country = found.country.as_deref().unwrap_or_default(),
            "geocoded city"
        );
        Ok(found)
    }

    /// Fetches current weather for a coordinate pair.
    ///
    /// # Arguments
    /// * `lat` - Latitude, from -90 to 90
    /// * `lon` - Longitude, from -180 to 180
    pub async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherData, FetchError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(FetchError::Upstream {
                code: StatusCode::BAD_REQUEST.as_u16(),
                message: "Invalid latitude. Must be between -90 and 90".to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(FetchError::Upstream {
                code: StatusCode::BAD_REQUEST.as_u16(),
                message: "Invalid longitude. Must be between -180 and 180".to_string(),
            });
        }

        let lat = format!("{lat:.6}");
        let lon = format!("{lon:.6}");
        let response = self
            .client
            .get(&self.weather_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, &format!("{lat},{lon}")));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn fetch(&self, city: &str) -> Result<WeatherData, FetchError> {
        let coords = self.geocode(city).await?;
        match self.fetch_by_coordinates(coords.lat, coords.lon).await {
            Err(FetchError::NotFound(_)) => Err(FetchError::NotFound(city.to_string())),
            other => other,
        }
    }
}

/// Maps a non-success status to the matching fetch error.
fn status_error(status: StatusCode, body: &str, subject: &str) -> FetchError {
    let message = match status {
        StatusCode::NOT_FOUND => return FetchError::NotFound(subject.to_string()),
        StatusCode::UNAUTHORIZED => "Invalid API key".to_string(),
        StatusCode::TOO_MANY_REQUESTS => "Request limit exceeded, try again later".to_string(),
        s if s.is_server_error() => "OpenWeather server error, try again later".to_string(),
        _ if body.is_empty() => "Unknown error".to_string(),
        _ => body.to_string(),
    };

    FetchError::Upstream {
        code: status.as_u16(),
        message,
    }
}
