//! Handlers for the `/admin/homepage-sections` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vitrine_core::error::CoreError;
use vitrine_core::homepage::{validate_reorder, validate_section_content, validate_section_type};
use vitrine_core::types::DbId;
use vitrine_db::models::homepage_section::{
    CreateHomepageSection, HomepageSection, ReorderHomepageSections, UpdateHomepageSection,
};
use vitrine_db::repositories::HomepageSectionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "HomepageSection",
        id,
    })
}

/// POST /api/v1/admin/homepage-sections
///
/// Without an explicit `position` the section is appended at the end.
pub async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateHomepageSection>,
) -> AppResult<(StatusCode, Json<DataResponse<HomepageSection>>)> {
    validate_section_type(&input.section_type)?;
    validate_section_content(&input.content)?;
    let section = HomepageSectionRepo::create(&state.pool, &input).await?;
    tracing::info!(
        section_id = section.id,
        section_type = %section.section_type,
        position = section.position,
        "Homepage section created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: section })))
}

/// GET /api/v1/admin/homepage-sections
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<HomepageSection>>>> {
    let sections = HomepageSectionRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: sections }))
}

/// GET /api/v1/admin/homepage-sections/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<HomepageSection>>> {
    let section = HomepageSectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: section }))
}

/// PUT /api/v1/admin/homepage-sections/{id}
pub async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHomepageSection>,
) -> AppResult<Json<DataResponse<HomepageSection>>> {
    if let Some(content) = &input.content {
        validate_section_content(content)?;
    }
    let section = HomepageSectionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: section }))
}

/// PUT /api/v1/admin/homepage-sections/reorder
///
/// `section_ids` must list every section exactly once; positions are
/// rewritten in one transaction.
pub async fn reorder(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<ReorderHomepageSections>,
) -> AppResult<Json<DataResponse<Vec<HomepageSection>>>> {
    let existing = HomepageSectionRepo::list_ids(&state.pool).await?;
    validate_reorder(&existing, &input.section_ids)?;
    HomepageSectionRepo::reorder(&state.pool, &input.section_ids).await?;

    let sections = HomepageSectionRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: sections }))
}

/// DELETE /api/v1/admin/homepage-sections/{id}
pub async fn delete(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if HomepageSectionRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
