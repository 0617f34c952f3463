//! Repository for the `registrations` table.

use sqlx::PgPool;
use tourkit_core::types::DbId;

use crate::models::registration::Registration;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tour_id, user_id, created_at";

/// Provides operations linking users to the tours they applied for.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Register a user for a tour, enforcing the capacity limit.
    ///
    /// The tour row is locked for the duration of the seat count so two
    /// concurrent registrations cannot both take the last seat. Returns
    /// `None` when the tour is full. Violating the
    /// `uq_registrations_tour_user` constraint surfaces as a database
    /// error the API layer maps to 409.
    pub async fn create_within_capacity(
        pool: &PgPool,
        tour_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let capacity: i32 =
            sqlx::query_scalar("SELECT capacity FROM tours WHERE id = $1 FOR UPDATE")
                .bind(tour_id)
                .fetch_one(&mut *tx)
                .await?;

        let taken: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE tour_id = $1")
                .bind(tour_id)
                .fetch_one(&mut *tx)
                .await?;

        if taken >= i64::from(capacity) {
            // Dropping the transaction rolls back and releases the lock.
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO registrations (tour_id, user_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let registration = sqlx::query_as::<_, Registration>(&query)
            .bind(tour_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(registration))
    }

    /// Withdraw a user's registration for a tour.
    ///
    /// Returns `true` if a registration existed and was removed.
    pub async fn delete(pool: &PgPool, tour_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM registrations WHERE tour_id = $1 AND user_id = $2")
            .bind(tour_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a user is registered for a tour.
    pub async fn exists(pool: &PgPool, tour_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let found: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM registrations WHERE tour_id = $1 AND user_id = $2")
                .bind(tour_id)
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        Ok(found.is_some())
    }

    /// Ids of all tours a user is registered for.
    pub async fn tour_ids_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT tour_id FROM registrations WHERE user_id = $1 ORDER BY tour_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Ids of all users registered for a tour.
    pub async fn user_ids_for_tour(pool: &PgPool, tour_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT user_id FROM registrations WHERE tour_id = $1")
            .bind(tour_id)
            .fetch_all(pool)
            .await
    }
}
