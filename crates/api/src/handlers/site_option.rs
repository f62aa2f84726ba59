//! Handlers for the `/admin/options` resource.
//!
//! Secret values are never returned: reads replace them with the mask, and
//! a write that echoes the mask back keeps the stored value.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vitrine_core::error::CoreError;
use vitrine_core::roles::ROLE_ADMIN;
use vitrine_core::site_option::{
    is_masked_echo, is_secret_key, mask_secrets, validate_key, REMOTE_DB_KEYS,
};
use vitrine_db::models::site_option::SetSiteOption;
use vitrine_db::repositories::SiteOptionRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// All options as a key/value map with secrets masked.
async fn masked_options(state: &AppState) -> AppResult<BTreeMap<String, String>> {
    let mut options: BTreeMap<String, String> = SiteOptionRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|o| (o.option_key, o.option_value))
        .collect();
    mask_secrets(&mut options);
    Ok(options)
}

/// Remote database credentials are only writable by admins.
fn check_writable(user: &AuthUser, key: &str) -> AppResult<()> {
    validate_key(key)?;
    if REMOTE_DB_KEYS.contains(&key) && user.role != ROLE_ADMIN {
        return Err(CoreError::Forbidden(format!("Only admins may change '{key}'")).into());
    }
    Ok(())
}

/// GET /api/v1/admin/options
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BTreeMap<String, String>>>> {
    let options = masked_options(&state).await?;
    Ok(Json(DataResponse { data: options }))
}

/// PUT /api/v1/admin/options
///
/// Bulk save from the settings form. Returns the full masked map.
pub async fn update_many(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<BTreeMap<String, String>>,
) -> AppResult<Json<DataResponse<BTreeMap<String, String>>>> {
    let mut changes = BTreeMap::new();
    for (key, value) in input {
        check_writable(&user, &key)?;
        if is_secret_key(&key) && is_masked_echo(&value) {
            continue;
        }
        changes.insert(key, value);
    }

    SiteOptionRepo::set_many(&state.pool, &changes).await?;
    tracing::info!(
        user_id = user.user_id,
        keys = ?changes.keys().collect::<Vec<_>>(),
        "Site options saved",
    );

    let options = masked_options(&state).await?;
    Ok(Json(DataResponse { data: options }))
}

/// PUT /api/v1/admin/options/{key}
pub async fn set_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<SetSiteOption>,
) -> AppResult<StatusCode> {
    check_writable(&user, &key)?;
    if !(is_secret_key(&key) && is_masked_echo(&input.value)) {
        SiteOptionRepo::set(&state.pool, &key, &input.value).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/options/{key}
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<StatusCode> {
    check_writable(&user, &key)?;
    if SiteOptionRepo::delete(&state.pool, &key).await? {
        tracing::info!(key = %key, "Site option deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(sqlx::Error::RowNotFound.into())
    }
}
