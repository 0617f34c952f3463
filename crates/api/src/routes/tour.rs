//! Route definitions for the `/tours` resource.
//!
//! Listing, detail, and search are public; create, image update, delay, and
//! cancel require the admin role; registration requires authentication.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{registration, tour};
use crate::state::AppState;

/// Routes mounted at `/tours`.
///
/// ```text
/// GET    /               -> list_tours
/// POST   /               -> create_tour (admin)
/// PUT    /preferences    -> update_preferences
/// GET    /search         -> search_tours
/// GET    /{id}           -> get_tour
/// DELETE /{id}           -> delete_tour (admin)
/// PUT    /{id}/images    -> update_images (admin)
/// POST   /{id}/delay     -> delay_tour (admin)
/// POST   /{id}/register  -> register
/// DELETE /{id}/register  -> withdraw
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tour::list_tours).post(tour::create_tour))
        .route("/preferences", put(tour::update_preferences))
        .route("/search", get(tour::search_tours))
        .route("/{id}", get(tour::get_tour).delete(tour::delete_tour))
        .route("/{id}/images", put(tour::update_images))
        .route("/{id}/delay", post(tour::delay_tour))
        .route(
            "/{id}/register",
            post(registration::register).delete(registration::withdraw),
        )
}
