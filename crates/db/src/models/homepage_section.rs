use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `homepage_sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HomepageSection {
    pub id: DbId,
    pub section_type: String,
    pub title: Option<String>,
    pub content: serde_json::Value,
    pub position: i32,
    pub is_visible: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending a section. Omitted `position` places it last.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHomepageSection {
    pub section_type: String,
    pub title: Option<String>,
    pub content: serde_json::Value,
    pub position: Option<i32>,
    pub is_visible: Option<bool>,
}

/// DTO for partially updating a section.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHomepageSection {
    pub title: Option<String>,
    pub content: Option<serde_json::Value>,
    pub is_visible: Option<bool>,
}

/// DTO for reordering: every section id in its new display order.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderHomepageSections {
    pub section_ids: Vec<DbId>,
}
