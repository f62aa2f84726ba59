//! Quote request models.
//!
//! `items` is stored as a JSON array and decoded straight into typed
//! [`QuoteItem`] values at the repository boundary.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use vitrine_core::quote::QuoteItem;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `quote_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuoteRequest {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub items: Json<Vec<QuoteItem>>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for an admin status change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuoteStatus {
    pub status: String,
}

/// DTO for editing the internal notes on a request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuoteNotes {
    pub admin_notes: Option<String>,
}

/// Listing filter for the admin quote inbox.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteFilter {
    pub status: Option<String>,
}
