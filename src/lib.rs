//! Weather Cache - A caching gateway in front of OpenWeather
//!
//! Keeps one bounded, TTL-checked LRU cache per API key, optionally
//! refreshed in the background, behind a registry of clients.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod registry;
pub mod tasks;

pub use api::AppState;
pub use client::WeatherClient;
pub use config::{CacheConfig, Config, Mode};
pub use error::{Result, WeatherError};
pub use fetcher::{FetchError, OpenWeatherFetcher, WeatherFetcher};
pub use registry::Registry;
