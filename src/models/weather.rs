//! OpenWeather wire model
//!
//! Mirrors the subset of the `/data/2.5/weather` response the gateway
//! passes through. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Current weather for one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    #[serde(default)]
    pub weather: Vec<Condition>,
    /// Temperature block (`main` on the wire)
    #[serde(rename = "main", default)]
    pub temperature: Option<Temperature>,
    #[serde(default)]
    pub visibility: Option<i64>,
    #[serde(default)]
    pub wind: Option<Wind>,
    /// Observation time, Unix seconds
    #[serde(rename = "dt", default)]
    pub datetime: Option<i64>,
    #[serde(default)]
    pub sys: Option<Sys>,
    /// Shift from UTC in seconds
    #[serde(default)]
    pub timezone: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Temperatures in the requested units (metric: Celsius).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
}
