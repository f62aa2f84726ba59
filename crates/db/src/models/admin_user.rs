use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `admin_users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an admin user. The password is already hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdminUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
