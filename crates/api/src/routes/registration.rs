//! Route definitions for the `/registrations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::registration;
use crate::state::AppState;

/// Routes mounted at `/registrations`.
///
/// ```text
/// GET / -> my_registrations (auth required)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(registration::my_registrations))
}
