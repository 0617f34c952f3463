//! Tour listing catalogue: sort orders, page-size limits, and the shared
//! listing preferences that back the `/tours` default view.

use serde::{Deserialize, Serialize};

/// Default number of tours per listing page.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Smallest accepted page size.
pub const MIN_PER_PAGE: i64 = 1;

/// Largest accepted page size.
pub const MAX_PER_PAGE: i64 = 50;

/// Accepted sort orders for the tour listing.
///
/// Each variant maps to a fixed `ORDER BY` clause; user input never reaches
/// the SQL text directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TourOrder {
    /// Soonest departure first.
    #[default]
    Date,
    /// Alphabetical by tour name.
    Name,
    /// Alphabetical by destination.
    Place,
}

impl TourOrder {
    /// The `ORDER BY` clause for this sort order.
    pub fn sql_clause(self) -> &'static str {
        match self {
            TourOrder::Date => "starts_at ASC, id ASC",
            TourOrder::Name => "name ASC, id ASC",
            TourOrder::Place => "place ASC, id ASC",
        }
    }

    /// Parse a query-string value (`date`, `name`, `place`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(TourOrder::Date),
            "name" => Some(TourOrder::Name),
            "place" => Some(TourOrder::Place),
            _ => None,
        }
    }
}

/// Clamp a requested page size into the accepted range.
pub fn clamp_per_page(requested: i64) -> i64 {
    requested.clamp(MIN_PER_PAGE, MAX_PER_PAGE)
}

/// Process-wide listing defaults, applied when a `/tours` request omits
/// `per_page` or `order_by`.
///
/// The booking UI lets any visitor change these from the listing page, so
/// they are shared state rather than per-session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingPrefs {
    pub per_page: i64,
    pub order_by: TourOrder,
}

impl Default for ListingPrefs {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            order_by: TourOrder::Date,
        }
    }
}
