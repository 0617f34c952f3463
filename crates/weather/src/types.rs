//! Forecast data shapes and the WMO weather-code table.

use chrono::NaiveDate;
use serde::Serialize;

/// One day of forecast for a tour destination.
#[derive(Debug, Clone, Serialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub precipitation_mm: f64,
    /// WMO weather interpretation code as reported upstream.
    pub weather_code: i32,
    /// Human-readable form of `weather_code`.
    pub description: &'static str,
}

/// Translate a WMO weather interpretation code into display text.
///
/// Covers the codes Open-Meteo documents; anything else reads "Unknown".
pub fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snowfall",
        77 => "Snow grains",
        80 | 81 | 82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}
