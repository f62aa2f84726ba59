//! Handlers for the `/admin/products` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use vitrine_core::error::CoreError;
use vitrine_core::slug::{is_valid_slug, resolve_slug};
use vitrine_core::types::DbId;
use vitrine_db::models::product::{CreateProduct, Product, ProductFilter, UpdateProduct};
use vitrine_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

/// POST /api/v1/admin/products
pub async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Product name is required".into()).into());
    }
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    let product = ProductRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(product_id = product.id, slug = %product.slug, "Product created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// GET /api/v1/admin/products?category_id=&published_only=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let products = ProductRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/admin/products/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: product }))
}

/// PUT /api/v1/admin/products/{id}
pub async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<DataResponse<Product>>> {
    if let Some(slug) = input.slug.as_deref() {
        if !is_valid_slug(slug) {
            return Err(CoreError::Validation(format!("Invalid slug '{slug}'")).into());
        }
    }
    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/admin/products/{id}
pub async fn delete(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProductRepo::delete(&state.pool, id).await? {
        tracing::info!(product_id = id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
