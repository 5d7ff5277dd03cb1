//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::client::WeatherClient;
use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::models::{
    ClientResponse, CreateClientRequest, DeleteResponse, HealthResponse, StatsResponse,
    WeatherResponse,
};
use crate::registry::Registry;

/// Header carrying the caller's OpenWeather API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    /// Credential used when a request carries no API key header
    pub default_api_key: Option<String>,
}

impl AppState {
    /// Creates a new AppState around the given registry.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            default_api_key: None,
        }
    }

    pub fn with_default_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.default_api_key = Some(api_key.into());
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Clients built by this state fetch from OpenWeather.
    pub fn from_config(config: &Config) -> Self {
        let state = Self::new(Registry::openweather(config.cache_config()));
        match &config.default_api_key {
            Some(key) => state.with_default_api_key(key.clone()),
            None => state,
        }
    }

    /// Resolves the client for a request: header key first, then the default.
    async fn client_for(&self, headers: &HeaderMap) -> Result<Arc<WeatherClient>> {
        let api_key = header_api_key(headers)
            .or_else(|| self.default_api_key.clone())
            .ok_or_else(|| {
                WeatherError::InvalidArgument(format!("Missing {} header", API_KEY_HEADER))
            })?;

        self.registry
            .get(&api_key)
            .await
            .ok_or_else(|| {
                WeatherError::UnknownClient("no client registered for this API key".to_string())
            })
    }
}

fn header_api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Handler for GET /weather/:city
///
/// Answers from the client's cache when fresh, otherwise fetches upstream.
pub async fn weather_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(city): Path<String>,
) -> Result<Json<WeatherResponse>> {
    let client = state.client_for(&headers).await?;
    let weather = client.lookup(&city).await?;

    Ok(Json(WeatherResponse::new(city.trim(), weather)))
}

/// Handler for POST /clients
///
/// Registers a client for an API key, or returns the existing one if the
/// mode matches.
pub async fn create_client_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateClientRequest>,
) -> Result<Json<ClientResponse>> {
    let mode = req.validate()?;
    let client = state.registry.create(&req.api_key, mode).await?;

    Ok(Json(ClientResponse::new(client.mode())))
}

/// Handler for DELETE /clients
///
/// Removes the client registered for the header's API key.
pub async fn delete_client_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<DeleteResponse> {
    let deleted = match header_api_key(&headers) {
        Some(api_key) => state.registry.delete(&api_key).await,
        None => false,
    };

    Json(DeleteResponse::new(deleted))
}

/// Handler for GET /stats
///
/// Returns cache statistics for the resolved client.
pub async fn stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>> {
    let client = state.client_for(&headers).await?;

    Ok(Json(StatsResponse::new(
        client.mode(),
        client.size().await,
        client.capacity().await,
        &client.stats().await,
    )))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
