//! Weather forecasts for tour destinations.
//!
//! Tour detail pages show a daily forecast for the destination. The upstream
//! is the Open-Meteo pair of services: a geocoding lookup to resolve the
//! place name, then the daily forecast endpoint. Handlers depend on the
//! [`ForecastProvider`] trait rather than the concrete client so tests can
//! substitute a stub.

mod client;
mod types;

pub use client::OpenMeteoProvider;
pub use types::{describe_weather_code, DailyForecast};

use async_trait::async_trait;

/// Errors from the weather layer.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream returned a non-2xx status code.
    #[error("Weather API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The geocoder found no match for the place name.
    #[error("Unknown place: {0}")]
    UnknownPlace(String),
}

/// Source of daily forecasts for a named place.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetch up to `days` daily forecasts for `place`, starting today.
    async fn forecast(&self, place: &str, days: u8) -> Result<Vec<DailyForecast>, WeatherError>;
}
