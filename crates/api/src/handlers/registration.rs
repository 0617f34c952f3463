//! Handlers for tour registrations.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tourkit_core::error::CoreError;
use tourkit_core::types::DbId;
use tourkit_db::repositories::{RegistrationRepo, TourRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/tours/{id}/register
///
/// Register the authenticated user for a tour. Rejected when the tour has
/// already departed (400), the user is already registered (409), or the
/// tour is at capacity (409).
pub async fn register(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(tour_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let tour = TourRepo::find_by_id(&state.pool, tour_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tour",
            id: tour_id,
        }))?;

    if tour.starts_at <= Utc::now() {
        return Err(AppError::Core(CoreError::Validation(
            "Tour has already departed".into(),
        )));
    }

    if RegistrationRepo::exists(&state.pool, tour_id, auth.user_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Already registered for this tour".into(),
        )));
    }

    // The seat count and insert run in one transaction holding a lock on
    // the tour row, so concurrent registrations cannot overshoot capacity.
    // A concurrent duplicate still trips uq_registrations_tour_user -> 409.
    let registration =
        RegistrationRepo::create_within_capacity(&state.pool, tour_id, auth.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::Conflict("Tour is full".into())))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": registration })),
    ))
}

/// DELETE /api/v1/tours/{id}/register
///
/// Withdraw the authenticated user's registration. 404 when no
/// registration exists.
pub async fn withdraw(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(tour_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = RegistrationRepo::delete(&state.pool, tour_id, auth.user_id).await?;

    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Registration",
            id: tour_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/registrations
///
/// Ids of the tours the authenticated user is registered for.
pub async fn my_registrations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DbId>>>> {
    let tour_ids = RegistrationRepo::tour_ids_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse { data: tour_ids }))
}
