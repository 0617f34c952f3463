//! Shared helpers for API integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! over the `#[sqlx::test]`-provided pool, with a stub forecast provider so
//! no test touches the network.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tower::ServiceExt;

use tourkit_api::auth::jwt::{generate_access_token, JwtConfig};
use tourkit_api::config::ServerConfig;
use tourkit_api::router::build_app_router;
use tourkit_api::state::AppState;
use tourkit_core::listing::ListingPrefs;
use tourkit_core::types::DbId;
use tourkit_db::models::tour::{CreateTour, Tour};
use tourkit_db::repositories::TourRepo;
use tourkit_weather::{DailyForecast, ForecastProvider, WeatherError};

/// Forecast stub: fixed synthetic days, or a hard failure when `fail` is set.
pub struct StubForecast {
    pub fail: bool,
}

#[async_trait]
impl ForecastProvider for StubForecast {
    async fn forecast(&self, place: &str, days: u8) -> Result<Vec<DailyForecast>, WeatherError> {
        if self.fail {
            return Err(WeatherError::UnknownPlace(place.to_string()));
        }
        let today = Utc::now().date_naive();
        Ok((0..days)
            .map(|offset| DailyForecast {
                date: today + Duration::days(i64::from(offset)),
                min_temp_c: 5.0,
                max_temp_c: 18.0,
                precipitation_mm: 0.4,
                weather_code: 2,
                description: "Partly cloudy",
            })
            .collect())
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
        weather_forecast_url: "http://forecast.invalid".to_string(),
        weather_geocoding_url: "http://geocoding.invalid".to_string(),
    }
}

/// JWT config shared by the test app and token helpers.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build the application router over `pool` with a working forecast stub.
///
/// Clone the returned router per request; clones share state, so listing
/// preference changes persist across requests within a test.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_forecast(pool, StubForecast { fail: false })
}

/// Build the application router with a caller-supplied forecast provider.
pub fn build_test_app_with_forecast(pool: PgPool, forecast: impl ForecastProvider + 'static) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        forecast: Arc::new(forecast),
        listing_prefs: Arc::new(RwLock::new(ListingPrefs::default())),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    request(app, "GET", uri, None, None).await
}

/// Send a GET request with a bearer token.
pub async fn get_authed(app: Router, uri: &str, token: &str) -> Response {
    request(app, "GET", uri, Some(token), None).await
}

/// Send a POST request with a JSON body and optional bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    request(app, "POST", uri, token, Some(body)).await
}

/// Send a PUT request with a JSON body and optional bearer token.
pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    request(app, "PUT", uri, token, Some(body)).await
}

/// Send a DELETE request with an optional bearer token.
pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response {
    request(app, "DELETE", uri, token, None).await
}

async fn request(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Insert a user directly and mint a matching access token.
///
/// The password hash is a placeholder; tests exercising login go through
/// `/auth/register` instead.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> (DbId, String) {
    let id: DbId = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash, role)
         VALUES ($1, $2, 'x', $3)
         RETURNING id",
    )
    .bind(username)
    .bind(format!("{username}@example.com"))
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("seed user");

    let token = generate_access_token(id, role, &test_jwt_config()).expect("mint token");
    (id, token)
}

/// Insert a tour departing `days_from_now` days in the future (negative for
/// the past) with the given capacity.
pub async fn seed_tour(pool: &PgPool, name: &str, place: &str, days_from_now: i64, capacity: i32) -> Tour {
    TourRepo::create(
        pool,
        &CreateTour {
            name: name.to_string(),
            place: place.to_string(),
            description: String::new(),
            starts_at: Utc::now() + Duration::days(days_from_now),
            capacity,
            image_urls: String::new(),
        },
    )
    .await
    .expect("seed tour")
}

/// Insert a tour departing at midnight UTC on the given calendar day.
pub async fn seed_tour_on(pool: &PgPool, name: &str, place: &str, date: NaiveDate) -> Tour {
    TourRepo::create(
        pool,
        &CreateTour {
            name: name.to_string(),
            place: place.to_string(),
            description: String::new(),
            starts_at: date.and_time(chrono::NaiveTime::MIN).and_utc(),
            capacity: 20,
            image_urls: String::new(),
        },
    )
    .await
    .expect("seed tour")
}

/// Assert a response carries the standard error envelope with `code`.
pub async fn assert_error_code(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error body: {json}");
}
