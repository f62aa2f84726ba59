//! URL slug generation for categories and products.

use crate::error::CoreError;

/// Maximum slug length; matches the `VARCHAR(190)` slug columns.
pub const MAX_SLUG_LENGTH: usize = 190;

/// Derive a URL slug from a display name.
///
/// Lowercases ASCII letters, keeps digits, and collapses every other run of
/// characters into a single hyphen. Leading/trailing hyphens are trimmed.
///
/// ```
/// use vitrine_core::slug::slugify;
///
/// assert_eq!(slugify("Industrial Pumps & Valves"), "industrial-pumps-valves");
/// assert_eq!(slugify("  --X200  "), "x200");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// Resolve the slug to store: an explicit slug is validated, otherwise one is
/// derived from `name`.
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, CoreError> {
    let slug = match explicit {
        Some(s) => {
            let s = s.trim();
            if !is_valid_slug(s) {
                return Err(CoreError::Validation(format!(
                    "Invalid slug '{s}': use lowercase letters, digits and single hyphens"
                )));
            }
            s.to_string()
        }
        None => slugify(name),
    };

    if slug.is_empty() {
        return Err(CoreError::Validation(
            "Cannot derive a slug from an empty name".into(),
        ));
    }
    Ok(slug)
}

/// Check that `s` is already in canonical slug form.
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_SLUG_LENGTH
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
