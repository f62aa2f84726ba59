//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod admin_user;
pub mod category;
pub mod homepage_section;
pub mod product;
pub mod quote_request;
pub mod site_option;
pub mod translation;
