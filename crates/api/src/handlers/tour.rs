//! Handlers for the `/tours` resource: listing, detail, search, and the
//! admin operations (create, image update, delay, cancel).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tourkit_core::error::CoreError;
use tourkit_core::listing::{clamp_per_page, ListingPrefs, TourOrder};
use tourkit_core::types::{DbId, Timestamp};
use tourkit_db::models::tour::{CreateTour, Tour};
use tourkit_db::repositories::{NotificationRepo, RegistrationRepo, TourRepo};
use tourkit_weather::DailyForecast;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Days of forecast shown on the tour detail page.
const FORECAST_DAYS: u8 = 7;

// ---------------------------------------------------------------------------
// Query / request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tours`.
///
/// Absent `per_page`/`order_by` fall back to the shared listing preferences.
#[derive(Debug, Deserialize)]
pub struct ListToursQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub order_by: Option<String>,
}

/// Request body for `PUT /tours/preferences`.
#[derive(Debug, Deserialize)]
pub struct UpdatePrefsRequest {
    pub per_page: Option<i64>,
    pub order_by: Option<String>,
}

/// Query parameters for `GET /tours/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub place: Option<String>,
    /// Departure day, `YYYY-MM-DD`, matched against the UTC calendar day.
    pub date: Option<NaiveDate>,
}

/// Request body for `POST /tours` (admin).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTourRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 120, message = "place must be 1-120 characters"))]
    pub place: String,
    #[serde(default)]
    pub description: String,
    pub starts_at: Timestamp,
    #[validate(range(min = 1, max = 10000, message = "capacity must be 1-10000"))]
    pub capacity: i32,
    #[serde(default)]
    pub image_urls: String,
}

/// Request body for `PUT /tours/{id}/images` (admin).
#[derive(Debug, Deserialize)]
pub struct UpdateImagesRequest {
    pub image_urls: String,
}

/// Request body for `POST /tours/{id}/delay` (admin).
#[derive(Debug, Deserialize)]
pub struct DelayTourRequest {
    pub new_date: Timestamp,
}

/// Response payload for `GET /tours`.
#[derive(Debug, Serialize)]
pub struct TourListResponse {
    #[serde(flatten)]
    pub listing: PageResponse<Tour>,
    pub order_by: TourOrder,
    /// Ids of all tours the authenticated caller is registered for (not
    /// just those on this page); empty for anonymous callers.
    pub registered_tour_ids: Vec<DbId>,
}

/// Response payload for `GET /tours/{id}`.
#[derive(Debug, Serialize)]
pub struct TourDetailResponse {
    pub tour: Tour,
    /// `None` when the forecast service is unavailable -- the page still renders.
    pub weather: Option<Vec<DailyForecast>>,
    /// Whether the authenticated caller is registered for this tour.
    pub registered: bool,
}

// ---------------------------------------------------------------------------
// Public listing / detail / search
// ---------------------------------------------------------------------------

/// GET /api/v1/tours
///
/// Paginated, sorted tour listing. `page` is 1-based; `per_page` and
/// `order_by` default to the shared listing preferences when omitted.
pub async fn list_tours(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListToursQuery>,
) -> AppResult<Json<TourListResponse>> {
    let page = params.page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::Core(CoreError::Validation(
            "page must be >= 1".into(),
        )));
    }

    let prefs = *state.listing_prefs.read().await;

    let per_page = match params.per_page {
        Some(requested) => clamp_per_page(requested),
        None => prefs.per_page,
    };
    let order_by = match params.order_by.as_deref() {
        Some(value) => parse_order(value)?,
        None => prefs.order_by,
    };

    let (items, total) = TourRepo::page(&state.pool, page, per_page, order_by).await?;

    let registered_tour_ids = match &auth {
        Some(user) => RegistrationRepo::tour_ids_for_user(&state.pool, user.user_id).await?,
        None => Vec::new(),
    };

    Ok(Json(TourListResponse {
        listing: PageResponse::new(items, page, per_page, total),
        order_by,
        registered_tour_ids,
    }))
}

/// PUT /api/v1/tours/preferences
///
/// Update the shared listing defaults. Only provided fields change.
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(input): Json<UpdatePrefsRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let order_by = input.order_by.as_deref().map(parse_order).transpose()?;

    let mut prefs = state.listing_prefs.write().await;
    if let Some(per_page) = input.per_page {
        prefs.per_page = clamp_per_page(per_page);
    }
    if let Some(order) = order_by {
        prefs.order_by = order;
    }
    let current: ListingPrefs = *prefs;
    drop(prefs);

    tracing::info!(per_page = current.per_page, order_by = ?current.order_by, "Listing preferences updated");

    Ok(Json(serde_json::json!({ "data": current })))
}

/// GET /api/v1/tours/{id}
///
/// Tour detail with a destination forecast and the caller's registration
/// state. Forecast failures degrade to `weather: null`.
pub async fn get_tour(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<AppState>,
    Path(tour_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let tour = TourRepo::find_by_id(&state.pool, tour_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tour",
            id: tour_id,
        }))?;

    let weather = match state.forecast.forecast(&tour.place, FORECAST_DAYS).await {
        Ok(days) => Some(days),
        Err(e) => {
            tracing::warn!(place = %tour.place, error = %e, "Forecast lookup failed");
            None
        }
    };

    let registered = match &auth {
        Some(user) => RegistrationRepo::exists(&state.pool, tour_id, user.user_id).await?,
        None => false,
    };

    let detail = TourDetailResponse {
        tour,
        weather,
        registered,
    };
    Ok(Json(serde_json::json!({ "data": detail })))
}

/// GET /api/v1/tours/search
///
/// Conditional search dispatch: place and date AND together; place alone
/// matches a destination substring; date alone matches the departure day;
/// neither returns an empty result rather than an error.
pub async fn search_tours(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<Vec<Tour>>>> {
    // HTML forms submit empty fields; treat them as absent.
    let place = params.place.as_deref().map(str::trim).filter(|p| !p.is_empty());

    let results = match (place, params.date) {
        (Some(place), Some(date)) => {
            TourRepo::search_by_place_and_date(&state.pool, place, date).await?
        }
        (Some(place), None) => TourRepo::search_by_place(&state.pool, place).await?,
        (None, Some(date)) => TourRepo::search_by_date(&state.pool, date).await?,
        (None, None) => Vec::new(),
    };

    Ok(Json(DataResponse { data: results }))
}

// ---------------------------------------------------------------------------
// Admin operations
// ---------------------------------------------------------------------------

/// POST /api/v1/tours
///
/// Create a tour (admin only).
pub async fn create_tour(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTourRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let tour = TourRepo::create(
        &state.pool,
        &CreateTour {
            name: input.name,
            place: input.place,
            description: input.description,
            starts_at: input.starts_at,
            capacity: input.capacity,
            image_urls: input.image_urls,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": tour })),
    ))
}

/// PUT /api/v1/tours/{id}/images
///
/// Replace a tour's image URL list (admin only).
pub async fn update_images(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tour_id): Path<DbId>,
    Json(input): Json<UpdateImagesRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let tour = TourRepo::update_images(&state.pool, tour_id, &input.image_urls)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tour",
            id: tour_id,
        }))?;

    Ok(Json(serde_json::json!({ "data": tour })))
}

/// POST /api/v1/tours/{id}/delay
///
/// Reschedule a tour to a later date and notify every registered user
/// (admin only). A `new_date` not in the future is rejected before any
/// write.
pub async fn delay_tour(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tour_id): Path<DbId>,
    Json(input): Json<DelayTourRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if input.new_date <= Utc::now() {
        return Err(AppError::Core(CoreError::Validation(
            "new_date must be in the future".into(),
        )));
    }

    let name = TourRepo::name_of(&state.pool, tour_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tour",
            id: tour_id,
        }))?;

    TourRepo::delay(&state.pool, tour_id, input.new_date).await?;

    let user_ids = RegistrationRepo::user_ids_for_tour(&state.pool, tour_id).await?;
    let body = format!(
        "The tour \"{name}\" has been rescheduled to {}. \
         Your registration remains valid for the new date.",
        input.new_date.format("%Y-%m-%d %H:%M UTC")
    );
    let notified =
        NotificationRepo::insert_for_users(&state.pool, &user_ids, "Tour delayed", &body).await?;

    tracing::info!(tour_id, notified, "Tour delayed");

    Ok(Json(serde_json::json!({
        "data": { "tour_id": tour_id, "new_date": input.new_date, "notified": notified }
    })))
}

/// DELETE /api/v1/tours/{id}
///
/// Cancel a tour and notify everyone who was registered (admin only).
pub async fn delete_tour(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tour_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let name = TourRepo::name_of(&state.pool, tour_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tour",
            id: tour_id,
        }))?;

    // Affected user ids are collected before the rows disappear.
    let user_ids = TourRepo::delete(&state.pool, tour_id).await?;

    let body = format!(
        "We are sorry: the tour \"{name}\" has been cancelled. \
         Thank you for your understanding."
    );
    let notified =
        NotificationRepo::insert_for_users(&state.pool, &user_ids, "Tour cancelled", &body)
            .await?;

    tracing::info!(tour_id, notified, "Tour cancelled");

    Ok(Json(serde_json::json!({
        "data": { "tour_id": tour_id, "notified": notified }
    })))
}

/// Parse an `order_by` value against the catalogue, rejecting anything else.
fn parse_order(value: &str) -> Result<TourOrder, AppError> {
    TourOrder::parse(value).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "order_by must be one of: date, name, place (got '{value}')"
        )))
    })
}
