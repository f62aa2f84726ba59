//! Translation locale rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Locale codes look like `en`, `de_DE` or `pt-BR`.
static LOCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(?:[_-][A-Z]{2})?$").expect("valid regex"));

/// Maximum length of a translation key (`VARCHAR(190)` column).
pub const MAX_KEY_LENGTH: usize = 190;

/// Validate a locale code.
pub fn validate_locale(locale: &str) -> Result<(), CoreError> {
    if LOCALE_RE.is_match(locale) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid locale '{locale}'. Expected a code such as 'en' or 'de_DE'"
        )))
    }
}

/// Validate a translation key: non-empty, bounded, no whitespace.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    if key.is_empty() || key.len() > MAX_KEY_LENGTH || key.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "Invalid translation key '{key}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_locales() {
        for locale in ["en", "de_DE", "pt-BR"] {
            assert!(validate_locale(locale).is_ok(), "{locale}");
        }
    }

    #[test]
    fn rejects_malformed_locales() {
        for locale in ["", "EN", "english", "de_de", "de_DEU"] {
            assert!(validate_locale(locale).is_err(), "{locale}");
        }
    }

    #[test]
    fn keys_cannot_contain_whitespace() {
        assert!(validate_key("nav.products").is_ok());
        assert!(validate_key("nav products").is_err());
    }
}
