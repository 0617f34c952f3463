use std::sync::Arc;

use tokio::sync::RwLock;
use tourkit_core::listing::ListingPrefs;
use tourkit_weather::ForecastProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tourkit_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Weather forecast source for tour destinations.
    pub forecast: Arc<dyn ForecastProvider>,
    /// Process-wide listing defaults, adjustable from the listing page.
    pub listing_prefs: Arc<RwLock<ListingPrefs>>,
}
