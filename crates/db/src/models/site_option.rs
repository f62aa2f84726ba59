use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `site_options` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteOption {
    pub id: DbId,
    pub option_key: String,
    pub option_value: String,
    pub updated_at: Timestamp,
}

/// DTO for setting a single option value.
#[derive(Debug, Clone, Deserialize)]
pub struct SetSiteOption {
    pub value: String,
}
