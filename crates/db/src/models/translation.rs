use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `translations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Translation {
    pub id: DbId,
    pub locale: String,
    pub translation_key: String,
    pub translation_value: String,
    pub updated_at: Timestamp,
}

/// DTO for inserting or replacing one translated string.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertTranslation {
    pub locale: String,
    pub translation_key: String,
    pub translation_value: String,
}
