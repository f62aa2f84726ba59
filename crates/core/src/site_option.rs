//! Site option key catalogue and secret masking.
//!
//! Site options are flat key/value rows. Most drive public settings
//! (contact details, footer text); a few hold the remote database
//! credentials used by the sync tools.

use std::collections::BTreeMap;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Remote database (cPanel) keys
// ---------------------------------------------------------------------------

pub const KEY_CPANEL_DB_HOST: &str = "cpanel_db_host";
pub const KEY_CPANEL_DB_PORT: &str = "cpanel_db_port";
pub const KEY_CPANEL_DB_NAME: &str = "cpanel_db_name";
pub const KEY_CPANEL_DB_USER: &str = "cpanel_db_user";
pub const KEY_CPANEL_DB_PASSWORD: &str = "cpanel_db_password";
pub const KEY_PRODUCTION_URL: &str = "production_url";

/// Every key that makes up the remote database configuration.
pub const REMOTE_DB_KEYS: &[&str] = &[
    KEY_CPANEL_DB_HOST,
    KEY_CPANEL_DB_PORT,
    KEY_CPANEL_DB_NAME,
    KEY_CPANEL_DB_USER,
    KEY_CPANEL_DB_PASSWORD,
    KEY_PRODUCTION_URL,
];

/// Option keys whose values must never leave the server in clear text.
pub const SECRET_KEYS: &[&str] = &[KEY_CPANEL_DB_PASSWORD];

/// Placeholder returned in place of a stored secret.
pub const MASKED_VALUE: &str = "********";

/// Maximum option key length (`VARCHAR(190)` column).
pub const MAX_KEY_LENGTH: usize = 190;

/// Whether an option key holds a secret.
///
/// Besides the explicit [`SECRET_KEYS`], any key containing `password`,
/// `secret` or `token` is treated as secret.
pub fn is_secret_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SECRET_KEYS.contains(&lower.as_str())
        || ["password", "secret", "token"]
            .iter()
            .any(|needle| lower.contains(needle))
}

/// Replace secret values with [`MASKED_VALUE`] (empty secrets stay empty so
/// the admin UI can tell "unset" from "set").
pub fn mask_secrets(options: &mut BTreeMap<String, String>) {
    for (key, value) in options.iter_mut() {
        if is_secret_key(key) && !value.is_empty() {
            *value = MASKED_VALUE.to_string();
        }
    }
}

/// Whether an incoming value is the mask echoed back by a form, meaning
/// "keep the stored secret".
pub fn is_masked_echo(value: &str) -> bool {
    value == MASKED_VALUE
}

/// Validate an option key: lowercase snake case, bounded length.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    let well_formed = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');
    if well_formed {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid option key '{key}': use lowercase letters, digits, '_' or '.'"
        )))
    }
}
