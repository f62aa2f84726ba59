//! Repository for the `quote_requests` table.

use sqlx::types::Json;
use sqlx::MySqlPool;
use vitrine_core::quote::{QuoteStatus, QuoteSubmission};
use vitrine_core::types::DbId;

use crate::models::quote_request::QuoteRequest;

const COLUMNS: &str = "\
    id, name, email, company, phone, message, items, status, admin_notes, \
    created_at, updated_at";

/// Provides data access for submitted quote requests.
pub struct QuoteRequestRepo;

impl QuoteRequestRepo {
    /// Persist a validated submission with status `new`.
    pub async fn create(
        pool: &MySqlPool,
        submission: &QuoteSubmission,
    ) -> Result<QuoteRequest, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO quote_requests (name, email, company, phone, message, items, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.company)
        .bind(&submission.phone)
        .bind(&submission.message)
        .bind(Json(&submission.items))
        .bind(QuoteStatus::New.as_str())
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_id() as DbId)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a quote request by ID.
    pub async fn find_by_id(
        pool: &MySqlPool,
        id: DbId,
    ) -> Result<Option<QuoteRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quote_requests WHERE id = ?");
        sqlx::query_as::<_, QuoteRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all quote requests, newest first.
    pub async fn list(pool: &MySqlPool) -> Result<Vec<QuoteRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM quote_requests ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, QuoteRequest>(&query)
            .fetch_all(pool)
            .await
    }

    /// List quote requests in one status, newest first.
    pub async fn list_by_status(
        pool: &MySqlPool,
        status: QuoteStatus,
    ) -> Result<Vec<QuoteRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quote_requests WHERE status = ? \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, QuoteRequest>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Move a request to a new status.
    ///
    /// Returns `None` if the request does not exist.
    pub async fn update_status(
        pool: &MySqlPool,
        id: DbId,
        status: QuoteStatus,
    ) -> Result<Option<QuoteRequest>, sqlx::Error> {
        sqlx::query("UPDATE quote_requests SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(pool)
            .await?;
        Self::find_by_id(pool, id).await
    }

    /// Replace the internal admin notes (`None` clears them).
    pub async fn update_notes(
        pool: &MySqlPool,
        id: DbId,
        admin_notes: Option<&str>,
    ) -> Result<Option<QuoteRequest>, sqlx::Error> {
        sqlx::query("UPDATE quote_requests SET admin_notes = ? WHERE id = ?")
            .bind(admin_notes)
            .bind(id)
            .execute(pool)
            .await?;
        Self::find_by_id(pool, id).await
    }

    /// Count requests still in status `new` (admin dashboard badge).
    pub async fn count_new(pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quote_requests WHERE status = ?")
            .bind(QuoteStatus::New.as_str())
            .fetch_one(pool)
            .await
    }

    /// Delete a quote request.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &MySqlPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quote_requests WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
