//! Integration tests for the tour listing, detail, and admin operations.

mod common;

use axum::http::StatusCode;
use common::{
    assert_error_code, body_json, delete, get, post_json, put_json, seed_tour, seed_user,
    StubForecast,
};
use serde_json::json;
use sqlx::PgPool;
use tourkit_core::roles::{ROLE_ADMIN, ROLE_MEMBER};

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn listing_paginates_and_sorts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    for i in 0..25 {
        seed_tour(&pool, &format!("Tour {i:02}"), "Alps", 10 + i, 20).await;
    }

    // First page with an explicit page size.
    let response = get(app.clone(), "/api/v1/tours?page=1&per_page=10").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["total"], 25);
    assert_eq!(body["total_pages"], 3);
    // Default order is by departure date: the soonest tour comes first.
    assert_eq!(body["data"][0]["name"], "Tour 00");

    // Last page is a partial page.
    let response = get(app.clone(), "/api/v1/tours?page=3&per_page=10").await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    // A page past the end is empty but still well-formed.
    let response = get(app.clone(), "/api/v1/tours?page=9&per_page=10").await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 25);

    // Sorting by name.
    let response = get(app, "/api/v1/tours?page=1&per_page=5&order_by=name").await;
    let body = body_json(response).await;
    assert_eq!(body["order_by"], "name");
    assert_eq!(body["data"][0]["name"], "Tour 00");
}

#[sqlx::test(migrations = "../../migrations")]
async fn listing_rejects_bad_parameters(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/tours?page=0").await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let response = get(app.clone(), "/api/v1/tours?order_by=price").await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    // Non-numeric page is rejected by query deserialization.
    let response = get(app, "/api/v1/tours?page=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn listing_clamps_per_page(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed_tour(&pool, "Ridge Walk", "Alps", 5, 20).await;

    let response = get(app.clone(), "/api/v1/tours?per_page=9999").await;
    let body = body_json(response).await;
    assert_eq!(body["per_page"], 50);

    let response = get(app, "/api/v1/tours?per_page=0").await;
    let body = body_json(response).await;
    assert_eq!(body["per_page"], 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn listing_tolerates_huge_page_numbers(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed_tour(&pool, "Ridge Walk", "Alps", 5, 20).await;

    // The largest representable page must not overflow the OFFSET math;
    // it is just an empty page with the usual envelope.
    let uri = format!("/api/v1/tours?page={}&per_page=50", i64::MAX);
    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn listing_marks_registered_tours_for_authed_caller(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let tour = seed_tour(&pool, "Ridge Walk", "Alps", 5, 20).await;
    seed_tour(&pool, "Lake Loop", "Dolomites", 6, 20).await;
    let (_, token) = seed_user(&pool, "hiker", ROLE_MEMBER).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/tours/{}/register", tour.id),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = common::get_authed(app.clone(), "/api/v1/tours", &token).await;
    let body = body_json(response).await;
    assert_eq!(body["registered_tour_ids"], json!([tour.id]));

    // Anonymous callers get an empty list.
    let response = get(app, "/api/v1/tours").await;
    let body = body_json(response).await;
    assert_eq!(body["registered_tour_ids"], json!([]));
}

// ---------------------------------------------------------------------------
// Listing preferences
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn preferences_change_listing_defaults(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    for i in 0..10 {
        seed_tour(&pool, &format!("Tour {i}"), "Alps", 10 + i, 20).await;
    }

    let response = put_json(
        app.clone(),
        "/api/v1/tours/preferences",
        None,
        json!({ "per_page": 3, "order_by": "place" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["per_page"], 3);
    assert_eq!(body["data"]["order_by"], "place");

    // A bare listing request now uses the stored defaults.
    let response = get(app.clone(), "/api/v1/tours").await;
    let body = body_json(response).await;
    assert_eq!(body["per_page"], 3);
    assert_eq!(body["order_by"], "place");
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // Explicit query parameters still win.
    let response = get(app.clone(), "/api/v1/tours?per_page=5&order_by=date").await;
    let body = body_json(response).await;
    assert_eq!(body["per_page"], 5);
    assert_eq!(body["order_by"], "date");

    // Unknown order values are rejected, leaving the stored prefs alone.
    let response = put_json(
        app.clone(),
        "/api/v1/tours/preferences",
        None,
        json!({ "order_by": "price" }),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let response = get(app, "/api/v1/tours").await;
    let body = body_json(response).await;
    assert_eq!(body["order_by"], "place");
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn detail_includes_forecast_and_registration_state(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let tour = seed_tour(&pool, "Ridge Walk", "Alps", 5, 20).await;
    let (_, token) = seed_user(&pool, "hiker", ROLE_MEMBER).await;

    // Anonymous: forecast present, not registered.
    let response = get(app.clone(), &format!("/api/v1/tours/{}", tour.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["tour"]["name"], "Ridge Walk");
    assert_eq!(body["data"]["weather"].as_array().unwrap().len(), 7);
    assert_eq!(body["data"]["weather"][0]["description"], "Partly cloudy");
    assert_eq!(body["data"]["registered"], false);

    // Registered caller sees their state.
    post_json(
        app.clone(),
        &format!("/api/v1/tours/{}/register", tour.id),
        Some(&token),
        json!({}),
    )
    .await;
    let response =
        common::get_authed(app, &format!("/api/v1/tours/{}", tour.id), &token).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["registered"], true);
}

#[sqlx::test(migrations = "../../migrations")]
async fn detail_degrades_when_forecast_fails(pool: PgPool) {
    let app = common::build_test_app_with_forecast(pool.clone(), StubForecast { fail: true });
    let tour = seed_tour(&pool, "Ridge Walk", "Atlantis", 5, 20).await;

    let response = get(app, &format!("/api/v1/tours/{}", tour.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["tour"]["name"], "Ridge Walk");
    assert!(body["data"]["weather"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn detail_of_missing_tour_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/tours/9999").await;
    assert_error_code(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Admin: create / images
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn create_tour_requires_admin(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin_token) = seed_user(&pool, "admin", ROLE_ADMIN).await;
    let (_, member_token) = seed_user(&pool, "hiker", ROLE_MEMBER).await;

    let payload = json!({
        "name": "Ridge Walk",
        "place": "Alps",
        "starts_at": "2030-06-01T08:00:00Z",
        "capacity": 12,
    });

    // Anonymous -> 401.
    let response = post_json(app.clone(), "/api/v1/tours", None, payload.clone()).await;
    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;

    // Member -> 403.
    let response =
        post_json(app.clone(), "/api/v1/tours", Some(&member_token), payload.clone()).await;
    assert_error_code(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    // Admin -> 201.
    let response = post_json(app.clone(), "/api/v1/tours", Some(&admin_token), payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Ridge Walk");
    assert_eq!(body["data"]["capacity"], 12);

    // Validation applies to admins too.
    let response = post_json(
        app,
        "/api/v1/tours",
        Some(&admin_token),
        json!({
            "name": "",
            "place": "Alps",
            "starts_at": "2030-06-01T08:00:00Z",
            "capacity": 0,
        }),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_images_is_admin_only(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let tour = seed_tour(&pool, "Ridge Walk", "Alps", 5, 20).await;
    let (_, admin_token) = seed_user(&pool, "admin", ROLE_ADMIN).await;
    let (_, member_token) = seed_user(&pool, "hiker", ROLE_MEMBER).await;

    let uri = format!("/api/v1/tours/{}/images", tour.id);
    let payload = json!({ "image_urls": "a.jpg,b.jpg" });

    let response = put_json(app.clone(), &uri, Some(&member_token), payload.clone()).await;
    assert_error_code(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = put_json(app.clone(), &uri, Some(&admin_token), payload.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["image_urls"], "a.jpg,b.jpg");

    let response = put_json(app, "/api/v1/tours/9999/images", Some(&admin_token), payload).await;
    assert_error_code(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Admin: delay
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn delay_validates_date_and_notifies_registered_users(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let tour = seed_tour(&pool, "Ridge Walk", "Alps", 5, 20).await;
    let (_, admin_token) = seed_user(&pool, "admin", ROLE_ADMIN).await;
    let (_, hiker_token) = seed_user(&pool, "hiker", ROLE_MEMBER).await;
    let (_, walker_token) = seed_user(&pool, "walker", ROLE_MEMBER).await;

    for token in [&hiker_token, &walker_token] {
        let response = post_json(
            app.clone(),
            &format!("/api/v1/tours/{}/register", tour.id),
            Some(token),
            json!({}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let uri = format!("/api/v1/tours/{}/delay", tour.id);

    // A date in the past is rejected before any write.
    let response = put_or_post_delay(app.clone(), &uri, &admin_token, "2001-01-01T00:00:00Z").await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    // A future date reschedules and notifies both registered users.
    let response = put_or_post_delay(app.clone(), &uri, &admin_token, "2031-07-01T09:00:00Z").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["notified"], 2);

    let response = get(app.clone(), &format!("/api/v1/tours/{}", tour.id)).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["tour"]["starts_at"], "2031-07-01T09:00:00Z");

    let response = common::get_authed(app.clone(), "/api/v1/notifications", &hiker_token).await;
    let body = body_json(response).await;
    let notifications = body["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["title"], "Tour delayed");

    // Delaying a missing tour is 404.
    let response = put_or_post_delay(
        app,
        "/api/v1/tours/9999/delay",
        &admin_token,
        "2031-07-01T09:00:00Z",
    )
    .await;
    assert_error_code(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

async fn put_or_post_delay(
    app: axum::Router,
    uri: &str,
    token: &str,
    new_date: &str,
) -> axum::response::Response {
    post_json(app, uri, Some(token), json!({ "new_date": new_date })).await
}

// ---------------------------------------------------------------------------
// Admin: cancel
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn delete_tour_notifies_registered_users(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let tour = seed_tour(&pool, "Ridge Walk", "Alps", 5, 20).await;
    let (_, admin_token) = seed_user(&pool, "admin", ROLE_ADMIN).await;
    let (_, hiker_token) = seed_user(&pool, "hiker", ROLE_MEMBER).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/tours/{}/register", tour.id),
        Some(&hiker_token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Members cannot cancel.
    let response = delete(
        app.clone(),
        &format!("/api/v1/tours/{}", tour.id),
        Some(&hiker_token),
    )
    .await;
    assert_error_code(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = delete(
        app.clone(),
        &format!("/api/v1/tours/{}", tour.id),
        Some(&admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["notified"], 1);

    // The tour is gone and the user was told why.
    let response = get(app.clone(), &format!("/api/v1/tours/{}", tour.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = common::get_authed(app.clone(), "/api/v1/notifications", &hiker_token).await;
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["title"], "Tour cancelled");
    assert!(body["data"][0]["body"]
        .as_str()
        .unwrap()
        .contains("Ridge Walk"));

    // Cancelling again is 404.
    let response = delete(app, &format!("/api/v1/tours/{}", tour.id), Some(&admin_token)).await;
    assert_error_code(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}
