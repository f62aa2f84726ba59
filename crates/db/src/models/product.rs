//! Product catalog models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub category_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub sku: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Free-form specification table rendered on the product page.
    pub specifications: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub category_id: Option<DbId>,
    pub name: String,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for partially updating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProduct {
    pub category_id: Option<DbId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Query filters for product listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category_id: Option<DbId>,
    pub published_only: Option<bool>,
}
