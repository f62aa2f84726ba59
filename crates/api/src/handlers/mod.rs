//! HTTP handlers, one module per resource.

pub mod auth;
pub mod category;
pub mod database;
pub mod homepage;
pub mod product;
pub mod public;
pub mod quote;
pub mod site_option;
pub mod translation;
