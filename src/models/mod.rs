//! Data models
//!
//! The upstream wire model and the DTOs used for serializing/deserializing
//! gateway request and response bodies.

pub mod requests;
pub mod responses;
pub mod weather;

// Re-export commonly used types
pub use requests::CreateClientRequest;
pub use responses::{
    ClientResponse, DeleteResponse, ErrorResponse, HealthResponse, StatsResponse, WeatherResponse,
};
pub use weather::WeatherData;
