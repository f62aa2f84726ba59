use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category. `slug` is derived from `name` when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub sort_order: Option<i32>,
}

/// DTO for partially updating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub sort_order: Option<i32>,
}
