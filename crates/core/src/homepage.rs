//! Homepage section kinds and ordering rules.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

pub const SECTION_HERO: &str = "hero";
pub const SECTION_FEATURES: &str = "features";
pub const SECTION_PRODUCT_GRID: &str = "product_grid";
pub const SECTION_TESTIMONIALS: &str = "testimonials";
pub const SECTION_CTA: &str = "cta";
pub const SECTION_RICH_TEXT: &str = "rich_text";
pub const SECTION_LOGO_STRIP: &str = "logo_strip";

/// Every section kind the homepage builder can render.
pub const ALL_SECTION_TYPES: &[&str] = &[
    SECTION_HERO,
    SECTION_FEATURES,
    SECTION_PRODUCT_GRID,
    SECTION_TESTIMONIALS,
    SECTION_CTA,
    SECTION_RICH_TEXT,
    SECTION_LOGO_STRIP,
];

/// Validate a section kind against [`ALL_SECTION_TYPES`].
pub fn validate_section_type(section_type: &str) -> Result<(), CoreError> {
    if ALL_SECTION_TYPES.contains(&section_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown section type '{section_type}'. Must be one of: {}",
            ALL_SECTION_TYPES.join(", ")
        )))
    }
}

/// Section content must be a JSON object; the builder stores its settings
/// as keyed fields.
pub fn validate_section_content(content: &serde_json::Value) -> Result<(), CoreError> {
    if content.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Section content must be a JSON object".into(),
        ))
    }
}

/// Check that `requested` is a permutation of `existing`.
///
/// A reorder request has to name every section exactly once, otherwise the
/// resulting positions would have gaps or duplicates.
pub fn validate_reorder(existing: &[DbId], requested: &[DbId]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Section {id} appears more than once in the new order"
            )));
        }
    }

    let existing: HashSet<DbId> = existing.iter().copied().collect();
    if seen != existing {
        return Err(CoreError::Validation(
            "New order must list every homepage section exactly once".into(),
        ));
    }
    Ok(())
}
