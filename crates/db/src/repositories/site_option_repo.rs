//! Repository for the `site_options` key/value table.

use std::collections::BTreeMap;

use sqlx::MySqlPool;

use crate::models::site_option::SiteOption;

const COLUMNS: &str = "id, option_key, option_value, updated_at";

/// Provides access to flat key/value site settings.
pub struct SiteOptionRepo;

impl SiteOptionRepo {
    /// List every option ordered by key.
    pub async fn list(pool: &MySqlPool) -> Result<Vec<SiteOption>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_options ORDER BY option_key");
        sqlx::query_as::<_, SiteOption>(&query).fetch_all(pool).await
    }

    /// Fetch a single option value.
    pub async fn get(pool: &MySqlPool, key: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT option_value FROM site_options WHERE option_key = ?",
        )
        .bind(key)
        .fetch_optional(pool)
        .await
    }

    /// Fetch several options at once. Missing keys are simply absent from the map.
    pub async fn get_many(
        pool: &MySqlPool,
        keys: &[&str],
    ) -> Result<BTreeMap<String, String>, sqlx::Error> {
        if keys.is_empty() {
            return Ok(BTreeMap::new());
        }
        let placeholders = vec!["?"; keys.len()].join(", ");
        let query = format!(
            "SELECT option_key, option_value FROM site_options WHERE option_key IN ({placeholders})"
        );
        let mut q = sqlx::query_as::<_, (String, String)>(&query);
        for key in keys {
            q = q.bind(*key);
        }
        Ok(q.fetch_all(pool).await?.into_iter().collect())
    }

    /// Insert or replace one option.
    pub async fn set(pool: &MySqlPool, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO site_options (option_key, option_value) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE option_value = VALUES(option_value)",
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Insert or replace several options in one transaction.
    pub async fn set_many(
        pool: &MySqlPool,
        options: &BTreeMap<String, String>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (key, value) in options {
            sqlx::query(
                "INSERT INTO site_options (option_key, option_value) VALUES (?, ?) \
                 ON DUPLICATE KEY UPDATE option_value = VALUES(option_value)",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }

    /// Delete one option.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &MySqlPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM site_options WHERE option_key = ?")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
