//! Repository for the `homepage_sections` table.

use sqlx::MySqlPool;
use vitrine_core::types::DbId;

use crate::models::homepage_section::{
    CreateHomepageSection, HomepageSection, UpdateHomepageSection,
};

const COLUMNS: &str =
    "id, section_type, title, content, position, is_visible, created_at, updated_at";

/// Provides CRUD and ordering for homepage builder sections.
pub struct HomepageSectionRepo;

impl HomepageSectionRepo {
    /// Append a section. Without an explicit position it goes after the
    /// current last section.
    pub async fn create(
        pool: &MySqlPool,
        input: &CreateHomepageSection,
    ) -> Result<HomepageSection, sqlx::Error> {
        let position = match input.position {
            Some(p) => p,
            None => {
                let next = sqlx::query_scalar::<_, i64>(
                    "SELECT CAST(COALESCE(MAX(position) + 1, 0) AS SIGNED) FROM homepage_sections",
                )
                .fetch_one(pool)
                .await?;
                next as i32
            }
        };

        let result = sqlx::query(
            "INSERT INTO homepage_sections (section_type, title, content, position, is_visible) \
             VALUES (?, ?, ?, ?, COALESCE(?, TRUE))",
        )
        .bind(&input.section_type)
        .bind(&input.title)
        .bind(&input.content)
        .bind(position)
        .bind(input.is_visible)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_id() as DbId)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a section by ID.
    pub async fn find_by_id(
        pool: &MySqlPool,
        id: DbId,
    ) -> Result<Option<HomepageSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM homepage_sections WHERE id = ?");
        sqlx::query_as::<_, HomepageSection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sections in display order. `visible_only` is used by the public page.
    pub async fn list(
        pool: &MySqlPool,
        visible_only: bool,
    ) -> Result<Vec<HomepageSection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM homepage_sections \
             WHERE (? = FALSE OR is_visible = TRUE) \
             ORDER BY position, id"
        );
        sqlx::query_as::<_, HomepageSection>(&query)
            .bind(visible_only)
            .fetch_all(pool)
            .await
    }

    /// All section ids, used to validate reorder requests.
    pub async fn list_ids(pool: &MySqlPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM homepage_sections ORDER BY position, id")
            .fetch_all(pool)
            .await
    }

    /// Partially update a section.
    pub async fn update(
        pool: &MySqlPool,
        id: DbId,
        input: &UpdateHomepageSection,
    ) -> Result<Option<HomepageSection>, sqlx::Error> {
        sqlx::query(
            "UPDATE homepage_sections SET \
                 title = COALESCE(?, title), \
                 content = COALESCE(?, content), \
                 is_visible = COALESCE(?, is_visible) \
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.is_visible)
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    /// Rewrite positions to `0..n` following `ordered_ids`, in one transaction.
    pub async fn reorder(pool: &MySqlPool, ordered_ids: &[DbId]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (position, id) in ordered_ids.iter().enumerate() {
            sqlx::query("UPDATE homepage_sections SET position = ? WHERE id = ?")
                .bind(position as i32)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }

    /// Delete a section.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &MySqlPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM homepage_sections WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
