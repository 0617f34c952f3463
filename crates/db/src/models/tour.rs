//! Tour entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tourkit_core::types::{DbId, Timestamp};

/// A row from the `tours` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tour {
    pub id: DbId,
    pub name: String,
    /// Destination the tour visits; also the key for weather lookups.
    pub place: String,
    pub description: String,
    pub starts_at: Timestamp,
    pub capacity: i32,
    /// Comma-separated image URLs, edited as a single string by admins.
    pub image_urls: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new tour.
#[derive(Debug, Deserialize)]
pub struct CreateTour {
    pub name: String,
    pub place: String,
    #[serde(default)]
    pub description: String,
    pub starts_at: Timestamp,
    pub capacity: i32,
    #[serde(default)]
    pub image_urls: String,
}
