//! Repository for the `products` table.

use sqlx::MySqlPool;
use vitrine_core::types::DbId;

use crate::models::product::{CreateProduct, Product, ProductFilter, UpdateProduct};

const COLUMNS: &str = "\
    id, category_id, name, slug, sku, summary, description, specifications, \
    image_url, is_published, sort_order, created_at, updated_at";

/// Provides CRUD operations for catalog products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product with an already-resolved slug.
    pub async fn create(
        pool: &MySqlPool,
        input: &CreateProduct,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO products \
                 (category_id, name, slug, sku, summary, description, specifications, \
                  image_url, is_published, sort_order) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, COALESCE(?, FALSE), COALESCE(?, 0))",
        )
        .bind(input.category_id)
        .bind(&input.name)
        .bind(slug)
        .bind(&input.sku)
        .bind(&input.summary)
        .bind(&input.description)
        .bind(&input.specifications)
        .bind(&input.image_url)
        .bind(input.is_published)
        .bind(input.sort_order)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_id() as DbId)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a product by ID.
    pub async fn find_by_id(pool: &MySqlPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = ?");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published product by slug (public product page).
    pub async fn find_published_by_slug(
        pool: &MySqlPool,
        slug: &str,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM products WHERE slug = ? AND is_published = TRUE");
        sqlx::query_as::<_, Product>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List products in display order, optionally narrowed by category and
    /// publication state.
    pub async fn list(
        pool: &MySqlPool,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE (? IS NULL OR category_id = ?) \
               AND (? = FALSE OR is_published = TRUE) \
             ORDER BY sort_order, name"
        );
        let published_only = filter.published_only.unwrap_or(false);
        sqlx::query_as::<_, Product>(&query)
            .bind(filter.category_id)
            .bind(filter.category_id)
            .bind(published_only)
            .fetch_all(pool)
            .await
    }

    /// List every product in one category.
    pub async fn list_by_category(
        pool: &MySqlPool,
        category_id: DbId,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let filter = ProductFilter {
            category_id: Some(category_id),
            published_only: None,
        };
        Self::list(pool, &filter).await
    }

    /// Partially update a product. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &MySqlPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query(
            "UPDATE products SET \
                 category_id = COALESCE(?, category_id), \
                 name = COALESCE(?, name), \
                 slug = COALESCE(?, slug), \
                 sku = COALESCE(?, sku), \
                 summary = COALESCE(?, summary), \
                 description = COALESCE(?, description), \
                 specifications = COALESCE(?, specifications), \
                 image_url = COALESCE(?, image_url), \
                 is_published = COALESCE(?, is_published), \
                 sort_order = COALESCE(?, sort_order) \
             WHERE id = ?",
        )
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.sku)
        .bind(&input.summary)
        .bind(&input.description)
        .bind(&input.specifications)
        .bind(&input.image_url)
        .bind(input.is_published)
        .bind(input.sort_order)
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    /// Delete a product by ID.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &MySqlPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
