//! Admin authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- Signed session tokens for the admin panel.

pub mod jwt;
pub mod password;
