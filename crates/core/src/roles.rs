//! Well-known admin role name constants.
//!
//! These must match the `role` values accepted by the `admin_users` table.

/// Full access, including the database import/export/sync tools.
pub const ROLE_ADMIN: &str = "admin";
/// Content editing (catalog, homepage, translations, quotes) only.
pub const ROLE_EDITOR: &str = "editor";

/// Every role an admin user may hold.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR];

/// Check whether `role` is one of [`ALL_ROLES`].
pub fn is_valid_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}
