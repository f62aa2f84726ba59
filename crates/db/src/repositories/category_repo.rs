//! Repository for the `categories` table.

use sqlx::MySqlPool;
use vitrine_core::types::DbId;

use crate::models::category::{Category, CreateCategory, UpdateCategory};

const COLUMNS: &str = "id, name, slug, description, parent_id, sort_order, created_at, updated_at";

/// Provides CRUD operations for product categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category with an already-resolved slug.
    pub async fn create(
        pool: &MySqlPool,
        input: &CreateCategory,
        slug: &str,
    ) -> Result<Category, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO categories (name, slug, description, parent_id, sort_order) \
             VALUES (?, ?, ?, ?, COALESCE(?, 0))",
        )
        .bind(&input.name)
        .bind(slug)
        .bind(&input.description)
        .bind(input.parent_id)
        .bind(input.sort_order)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_id() as DbId)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a category by ID.
    pub async fn find_by_id(pool: &MySqlPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = ?");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all categories in display order.
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY sort_order, name");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Partially update a category. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &MySqlPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query(
            "UPDATE categories SET \
                 name = COALESCE(?, name), \
                 slug = COALESCE(?, slug), \
                 description = COALESCE(?, description), \
                 parent_id = COALESCE(?, parent_id), \
                 sort_order = COALESCE(?, sort_order) \
             WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.parent_id)
        .bind(input.sort_order)
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    /// Delete a category. Products keep existing with `category_id = NULL`.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &MySqlPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
