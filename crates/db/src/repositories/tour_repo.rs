//! Repository for the `tours` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use tourkit_core::listing::TourOrder;
use tourkit_core::types::{DbId, Timestamp};

use crate::models::tour::{CreateTour, Tour};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, place, description, starts_at, capacity, image_urls, created_at, updated_at";

/// Provides CRUD and search operations for tours.
pub struct TourRepo;

impl TourRepo {
    /// Insert a new tour, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTour) -> Result<Tour, sqlx::Error> {
        let query = format!(
            "INSERT INTO tours (name, place, description, starts_at, capacity, image_urls)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tour>(&query)
            .bind(&input.name)
            .bind(&input.place)
            .bind(&input.description)
            .bind(input.starts_at)
            .bind(input.capacity)
            .bind(&input.image_urls)
            .fetch_one(pool)
            .await
    }

    /// Find a tour by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tour>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tours WHERE id = $1");
        sqlx::query_as::<_, Tour>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up just the name of a tour.
    pub async fn name_of(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM tours WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch one page of tours plus the total row count.
    ///
    /// `page` is 1-based. The order clause comes from the [`TourOrder`]
    /// catalogue, never from user text.
    pub async fn page(
        pool: &PgPool,
        page: i64,
        per_page: i64,
        order: TourOrder,
    ) -> Result<(Vec<Tour>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tours ORDER BY {} LIMIT $1 OFFSET $2",
            order.sql_clause()
        );
        // Saturating arithmetic keeps an absurd `page` from overflowing;
        // the offset just lands past the end and yields an empty page.
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        let items = sqlx::query_as::<_, Tour>(&query)
            .bind(per_page)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tours")
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Find tours whose destination contains `place` (case-insensitive).
    pub async fn search_by_place(pool: &PgPool, place: &str) -> Result<Vec<Tour>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tours
             WHERE place ILIKE '%' || $1 || '%'
             ORDER BY starts_at ASC, id ASC"
        );
        sqlx::query_as::<_, Tour>(&query)
            .bind(place)
            .fetch_all(pool)
            .await
    }

    /// Find tours departing on the given UTC calendar day.
    pub async fn search_by_date(pool: &PgPool, date: NaiveDate) -> Result<Vec<Tour>, sqlx::Error> {
        let (start, end) = day_bounds(date);
        let query = format!(
            "SELECT {COLUMNS} FROM tours
             WHERE starts_at >= $1 AND starts_at < $2
             ORDER BY starts_at ASC, id ASC"
        );
        sqlx::query_as::<_, Tour>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Find tours matching both a destination substring and a departure day.
    pub async fn search_by_place_and_date(
        pool: &PgPool,
        place: &str,
        date: NaiveDate,
    ) -> Result<Vec<Tour>, sqlx::Error> {
        let (start, end) = day_bounds(date);
        let query = format!(
            "SELECT {COLUMNS} FROM tours
             WHERE place ILIKE '%' || $1 || '%'
               AND starts_at >= $2 AND starts_at < $3
             ORDER BY starts_at ASC, id ASC"
        );
        sqlx::query_as::<_, Tour>(&query)
            .bind(place)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Replace the image URL list of a tour.
    ///
    /// Returns the updated row, or `None` if no tour with that id exists.
    pub async fn update_images(
        pool: &PgPool,
        id: DbId,
        image_urls: &str,
    ) -> Result<Option<Tour>, sqlx::Error> {
        let query = format!(
            "UPDATE tours SET image_urls = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tour>(&query)
            .bind(id)
            .bind(image_urls)
            .fetch_optional(pool)
            .await
    }

    /// Reschedule a tour to a new departure time.
    ///
    /// Returns `true` if the row was updated.
    pub async fn delay(pool: &PgPool, id: DbId, new_date: Timestamp) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tours SET starts_at = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(new_date)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a tour, returning the ids of users who were registered for it.
    ///
    /// The ids are collected before the delete so callers can notify the
    /// affected users; the registrations themselves go away via FK cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_ids: Vec<DbId> =
            sqlx::query_scalar("SELECT user_id FROM registrations WHERE tour_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user_ids)
    }
}

/// UTC timestamp bounds `[start, end)` of a calendar day.
fn day_bounds(date: NaiveDate) -> (Timestamp, Timestamp) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + chrono::Duration::days(1))
}
