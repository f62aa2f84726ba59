//! Repository for the `translations` table.

use std::collections::BTreeMap;

use sqlx::MySqlPool;
use vitrine_core::types::DbId;

use crate::models::translation::{Translation, UpsertTranslation};

const COLUMNS: &str = "id, locale, translation_key, translation_value, updated_at";

/// Provides access to translated UI strings.
pub struct TranslationRepo;

impl TranslationRepo {
    /// List every translation row, grouped by locale then key.
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Translation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM translations ORDER BY locale, translation_key");
        sqlx::query_as::<_, Translation>(&query).fetch_all(pool).await
    }

    /// All strings for one locale as a `key -> value` map.
    pub async fn list_by_locale(
        pool: &MySqlPool,
        locale: &str,
    ) -> Result<BTreeMap<String, String>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT translation_key, translation_value FROM translations WHERE locale = ?",
        )
        .bind(locale)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// Distinct locales that have at least one string.
    pub async fn list_locales(pool: &MySqlPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT locale FROM translations ORDER BY locale")
            .fetch_all(pool)
            .await
    }

    /// Insert or replace a translated string keyed by `(locale, key)`.
    pub async fn upsert(
        pool: &MySqlPool,
        input: &UpsertTranslation,
    ) -> Result<Translation, sqlx::Error> {
        sqlx::query(
            "INSERT INTO translations (locale, translation_key, translation_value) \
             VALUES (?, ?, ?) \
             ON DUPLICATE KEY UPDATE translation_value = VALUES(translation_value)",
        )
        .bind(&input.locale)
        .bind(&input.translation_key)
        .bind(&input.translation_value)
        .execute(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM translations WHERE locale = ? AND translation_key = ?"
        );
        sqlx::query_as::<_, Translation>(&query)
            .bind(&input.locale)
            .bind(&input.translation_key)
            .fetch_one(pool)
            .await
    }

    /// Delete one translation row.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &MySqlPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM translations WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
