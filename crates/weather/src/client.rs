//! Open-Meteo client: geocoding lookup followed by the daily forecast call.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{describe_weather_code, DailyForecast};
use crate::{ForecastProvider, WeatherError};

/// Default forecast endpoint.
const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";

/// Default geocoding endpoint.
const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";

/// HTTP client for the Open-Meteo forecast and geocoding services.
pub struct OpenMeteoProvider {
    client: reqwest::Client,
    forecast_url: String,
    geocoding_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyBlock,
}

/// Column-oriented daily arrays as Open-Meteo returns them.
#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<NaiveDate>,
    weather_code: Vec<i32>,
    temperature_2m_min: Vec<f64>,
    temperature_2m_max: Vec<f64>,
    precipitation_sum: Vec<f64>,
}

impl OpenMeteoProvider {
    /// Create a provider against the public Open-Meteo endpoints.
    pub fn new() -> Self {
        Self::with_base_urls(
            DEFAULT_FORECAST_URL.to_string(),
            DEFAULT_GEOCODING_URL.to_string(),
        )
    }

    /// Create a provider against custom base URLs (used in tests and to
    /// point at a self-hosted instance).
    pub fn with_base_urls(forecast_url: String, geocoding_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            forecast_url,
            geocoding_url,
        }
    }

    /// Resolve a place name to coordinates via the geocoding service.
    async fn geocode(&self, place: &str) -> Result<(f64, f64), WeatherError> {
        let response = self
            .client
            .get(format!("{}/v1/search", self.geocoding_url))
            .query(&[("name", place), ("count", "1")])
            .send()
            .await?;

        let body: GeocodingResponse = Self::parse_response(response).await?;
        let hit = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::UnknownPlace(place.to_string()))?;
        Ok((hit.latitude, hit.longitude))
    }

    /// Check the status code and deserialize the body, preserving error
    /// bodies for diagnostics.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn forecast(&self, place: &str, days: u8) -> Result<Vec<DailyForecast>, WeatherError> {
        let (latitude, longitude) = self.geocode(place).await?;

        let response = self
            .client
            .get(format!("{}/v1/forecast", self.forecast_url))
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                (
                    "daily",
                    "weather_code,temperature_2m_min,temperature_2m_max,precipitation_sum"
                        .to_string(),
                ),
                ("forecast_days", days.to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await?;

        let body: ForecastResponse = Self::parse_response(response).await?;
        let daily = body.daily;

        let forecasts = daily
            .time
            .into_iter()
            .zip(daily.weather_code)
            .zip(daily.temperature_2m_min)
            .zip(daily.temperature_2m_max)
            .zip(daily.precipitation_sum)
            .map(
                |((((date, code), min_temp_c), max_temp_c), precipitation_mm)| DailyForecast {
                    date,
                    min_temp_c,
                    max_temp_c,
                    precipitation_mm,
                    weather_code: code,
                    description: describe_weather_code(code),
                },
            )
            .collect();

        Ok(forecasts)
    }
}
