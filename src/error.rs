//! Error types for the weather cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::fetcher::FetchError;
use crate::models::ErrorResponse;

// == Weather Error Enum ==
/// Unified error type for the registry, the clients and the HTTP gateway.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Blank credential, blank city name or missing mode
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A client already exists for this credential with another mode
    #[error("Configuration conflict: {0}")]
    ConfigurationConflict(String),

    /// No client is registered for the credential
    #[error("Unknown client: {0}")]
    UnknownClient(String),

    /// The upstream fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl WeatherError {
    /// HTTP status the gateway answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WeatherError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            WeatherError::ConfigurationConflict(_) => StatusCode::CONFLICT,
            WeatherError::UnknownClient(_) => StatusCode::NOT_FOUND,
            WeatherError::Fetch(FetchError::NotFound(_)) => StatusCode::NOT_FOUND,
            WeatherError::Fetch(FetchError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            WeatherError::Fetch(FetchError::Upstream { code: 429, .. }) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            WeatherError::Fetch(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the weather cache.
pub type Result<T> = std::result::Result<T, WeatherError>;
