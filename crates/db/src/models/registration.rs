//! Registration entity model: a user's application for a tour.

use serde::Serialize;
use sqlx::FromRow;
use tourkit_core::types::{DbId, Timestamp};

/// A row from the `registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: DbId,
    pub tour_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}
