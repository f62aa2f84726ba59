//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The signed-in admin user, from a Bearer token or the session cookie.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires a content role (admin or editor).

pub mod auth;
pub mod rbac;
