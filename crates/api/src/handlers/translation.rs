//! Handlers for the `/admin/translations` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vitrine_core::error::CoreError;
use vitrine_core::translation::{validate_key, validate_locale};
use vitrine_core::types::DbId;
use vitrine_db::models::translation::{Translation, UpsertTranslation};
use vitrine_db::repositories::TranslationRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/translations
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Translation>>>> {
    let translations = TranslationRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: translations }))
}

/// GET /api/v1/admin/translations/locales
pub async fn locales(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let locales = TranslationRepo::list_locales(&state.pool).await?;
    Ok(Json(DataResponse { data: locales }))
}

/// PUT /api/v1/admin/translations
///
/// Insert or replace the string for `(locale, translation_key)`.
pub async fn upsert(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<UpsertTranslation>,
) -> AppResult<Json<DataResponse<Translation>>> {
    validate_locale(&input.locale)?;
    validate_key(&input.translation_key)?;
    let translation = TranslationRepo::upsert(&state.pool, &input).await?;
    Ok(Json(DataResponse { data: translation }))
}

/// DELETE /api/v1/admin/translations/{id}
pub async fn delete(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TranslationRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound {
            entity: "Translation",
            id,
        }
        .into())
    }
}
