//! API Module
//!
//! HTTP handlers and routing for the weather gateway.
//!
//! # Endpoints
//! - `GET /weather/:city` - Current weather for a city, cached per API key
//! - `POST /clients` - Register a client for an API key and mode
//! - `DELETE /clients` - Remove the client for the `x-api-key` header
//! - `GET /stats` - Cache statistics for the resolved client
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
