//! Repository for the `admin_users` table.

use sqlx::MySqlPool;
use vitrine_core::types::DbId;

use crate::models::admin_user::{AdminUser, CreateAdminUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role, is_active, \
                       last_login_at, created_at, updated_at";

/// Provides data access for admin panel accounts.
pub struct AdminUserRepo;

impl AdminUserRepo {
    /// Insert a new admin user, returning the created row.
    pub async fn create(
        pool: &MySqlPool,
        input: &CreateAdminUser,
    ) -> Result<AdminUser, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO admin_users (username, email, password_hash, role) VALUES (?, ?, ?, ?)",
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.role)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_id() as DbId)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find an admin user by internal ID.
    pub async fn find_by_id(pool: &MySqlPool, id: DbId) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users WHERE id = ?");
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an admin user by username.
    pub async fn find_by_username(
        pool: &MySqlPool,
        username: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users WHERE username = ?");
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `last_login_at` after a successful login.
    pub async fn record_login(pool: &MySqlPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE admin_users SET last_login_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Number of admin accounts (used to decide whether to bootstrap one).
    pub async fn count(pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin_users")
            .fetch_one(pool)
            .await
    }
}
