pub mod auth;
pub mod health;
pub mod notification;
pub mod registration;
pub mod tour;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
///
/// /tours                               list (GET), create (POST, admin)
/// /tours/preferences                   update listing defaults (PUT)
/// /tours/search                        conditional search (GET)
/// /tours/{id}                          detail with forecast (GET), cancel (DELETE, admin)
/// /tours/{id}/images                   update image list (PUT, admin)
/// /tours/{id}/delay                    reschedule + notify (POST, admin)
/// /tours/{id}/register                 register (POST), withdraw (DELETE)
///
/// /registrations                       caller's registered tour ids (GET)
///
/// /notifications                       list (?unread_only, limit, offset)
/// /notifications/read-all              mark all read (POST)
/// /notifications/unread-count          unread count (GET)
/// /notifications/{id}/read             mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tours", tour::router())
        .nest("/registrations", registration::router())
        .nest("/notifications", notification::router())
}
