//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&MySqlPool` as the first argument. MySQL has no
//! `RETURNING`, so inserts and updates re-read the row by id.

pub mod admin_user_repo;
pub mod category_repo;
pub mod homepage_section_repo;
pub mod product_repo;
pub mod quote_request_repo;
pub mod site_option_repo;
pub mod translation_repo;

pub use admin_user_repo::AdminUserRepo;
pub use category_repo::CategoryRepo;
pub use homepage_section_repo::HomepageSectionRepo;
pub use product_repo::ProductRepo;
pub use quote_request_repo::QuoteRequestRepo;
pub use site_option_repo::SiteOptionRepo;
pub use translation_repo::TranslationRepo;
