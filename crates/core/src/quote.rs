//! Quote-request submission rules and status lifecycle.
//!
//! Public visitors submit a [`QuoteSubmission`] from the product pages; the
//! admin panel then moves the request through [`QuoteStatus`] values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Submission payload
// ---------------------------------------------------------------------------

/// A quote request as posted by the public site.
///
/// `name` and `email` default to empty strings when absent so that a missing
/// field surfaces as a validation error rather than a decode rejection.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct QuoteSubmission {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(max = 255))]
    pub company: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    #[validate(length(max = 10000))]
    pub message: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "Too many items in one request"), nested)]
    pub items: Vec<QuoteItem>,
}

/// One requested product line inside a quote.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate)]
pub struct QuoteItem {
    pub product_id: Option<DbId>,
    #[validate(length(min = 1, max = 255, message = "Item product name is required"))]
    pub product_name: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    pub notes: Option<String>,
}

impl QuoteSubmission {
    /// Trim whitespace, lowercase the email, and drop blank optional fields.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.company = non_blank(self.company);
        self.phone = non_blank(self.phone);
        self.message = non_blank(self.message);
        for item in &mut self.items {
            item.product_name = item.product_name.trim().to_string();
            item.notes = non_blank(item.notes.take());
        }
        self
    }
}

/// Normalize and validate a submission, converting failures to
/// [`CoreError::Validation`].
pub fn validate_submission(submission: QuoteSubmission) -> Result<QuoteSubmission, CoreError> {
    let submission = submission.normalized();
    submission.validate()?;
    Ok(submission)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Status lifecycle
// ---------------------------------------------------------------------------

/// Where a quote request sits in the sales pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    New,
    InProgress,
    Quoted,
    Closed,
    Rejected,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 5] = [
        QuoteStatus::New,
        QuoteStatus::InProgress,
        QuoteStatus::Quoted,
        QuoteStatus::Closed,
        QuoteStatus::Rejected,
    ];

    /// The value stored in `quote_requests.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::New => "new",
            QuoteStatus::InProgress => "in_progress",
            QuoteStatus::Quoted => "quoted",
            QuoteStatus::Closed => "closed",
            QuoteStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuoteStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid quote status '{s}'. \
                     Must be one of: new, in_progress, quoted, closed, rejected"
                ))
            })
    }
}
