//! Pure domain logic shared by the database, sync, and API crates.
//!
//! Nothing in this crate touches the network or the database.

pub mod error;
pub mod homepage;
pub mod quote;
pub mod roles;
pub mod site_option;
pub mod slug;
pub mod translation;
pub mod types;
