//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::config::Mode;
use crate::error::{Result, WeatherError};

/// Request body for registering a client (POST /clients)
///
/// # Fields
/// - `api_key`: OpenWeather API key the client is bound to
/// - `mode`: `on_demand` or `polling`; required
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub mode: Option<String>,
}

impl CreateClientRequest {
    /// Validates the request and returns the requested mode.
    pub fn validate(&self) -> Result<Mode> {
        if self.api_key.trim().is_empty() {
            return Err(WeatherError::InvalidArgument(
                "API key cannot be empty".to_string(),
            ));
        }
        Mode::parse_optional(self.mode.as_deref())
    }
}
