//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::config::Mode;
use crate::models::WeatherData;

/// Response body for GET /weather/:city
#[derive(Debug, Clone, Serialize)]
pub struct WeatherResponse {
    /// The city as requested
    pub city: String,
    pub weather: WeatherData,
}

impl WeatherResponse {
    pub fn new(city: impl Into<String>, weather: WeatherData) -> Self {
        Self {
            city: city.into(),
            weather,
        }
    }
}

/// Response body for POST /clients
#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    pub message: String,
    pub mode: Mode,
}

impl ClientResponse {
    pub fn new(mode: Mode) -> Self {
        Self {
            message: format!("Client ready in {} mode", mode),
            mode,
        }
    }
}

/// Response body for DELETE /clients
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Whether a client was registered and has been removed
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(deleted: bool) -> Self {
        Self { deleted }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub mode: Mode,
    /// Cities currently cached
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub evictions: u64,
    pub refreshes: u64,
    pub refresh_failures: u64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(mode: Mode, size: usize, capacity: usize, stats: &CacheStats) -> Self {
        Self {
            mode,
            size,
            capacity,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate(),
            evictions: stats.evictions,
            refreshes: stats.refreshes,
            refresh_failures: stats.refresh_failures,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_response_serialize() {
        let weather = WeatherData {
            name: Some("Paris".to_string()),
            ..WeatherData::default()
        };
        let json = serde_json::to_value(WeatherResponse::new("paris", weather)).unwrap();
        assert_eq!(json["city"], "paris");
        assert_eq!(json["weather"]["name"], "Paris");
    }

    #[test]
    fn test_client_response_serialize() {
        let json = serde_json::to_value(ClientResponse::new(Mode::Polling)).unwrap();
        assert_eq!(json["mode"], "polling");
        assert!(json["message"].as_str().unwrap().contains("polling"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..CacheStats::default()
        };
        let resp = StatsResponse::new(Mode::OnDemand, 3, 10, &stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.size, 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("Something went wrong")).unwrap();
        assert_eq!(json, r#"{"error":"Something went wrong"}"#);
    }
}
