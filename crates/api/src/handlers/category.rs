//! Handlers for the `/admin/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vitrine_core::error::CoreError;
use vitrine_core::slug::{is_valid_slug, resolve_slug};
use vitrine_core::types::DbId;
use vitrine_db::models::category::{Category, CreateCategory, UpdateCategory};
use vitrine_db::models::product::Product;
use vitrine_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// POST /api/v1/admin/categories
pub async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Category name is required".into()).into());
    }
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    let category = CategoryRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/admin/categories
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/admin/categories/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// GET /api/v1/admin/categories/{id}/products
pub async fn list_products(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let products = ProductRepo::list_by_category(&state.pool, id).await?;
    Ok(Json(DataResponse { data: products }))
}

/// PUT /api/v1/admin/categories/{id}
pub async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    if let Some(slug) = input.slug.as_deref() {
        if !is_valid_slug(slug) {
            return Err(CoreError::Validation(format!("Invalid slug '{slug}'")).into());
        }
    }
    if input.parent_id == Some(id) {
        return Err(CoreError::Validation("A category cannot be its own parent".into()).into());
    }
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/admin/categories/{id}
///
/// Products in the category keep existing with no category.
pub async fn delete(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CategoryRepo::delete(&state.pool, id).await? {
        tracing::info!(category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
