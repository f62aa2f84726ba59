//! Unauthenticated read endpoints used by the public site.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use vitrine_core::site_option::{is_secret_key, REMOTE_DB_KEYS};
use vitrine_core::translation::validate_locale;
use vitrine_core::types::DbId;
use vitrine_db::models::category::Category;
use vitrine_db::models::homepage_section::HomepageSection;
use vitrine_db::models::product::{Product, ProductFilter};
use vitrine_db::repositories::{
    CategoryRepo, HomepageSectionRepo, ProductRepo, SiteOptionRepo, TranslationRepo,
};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Whether an option may be shown to anonymous visitors.
fn is_public_option(key: &str) -> bool {
    !is_secret_key(key) && !REMOTE_DB_KEYS.contains(&key)
}

/// GET /api/v1/public/options
///
/// Site options minus secrets and the remote connection settings.
pub async fn options(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BTreeMap<String, String>>>> {
    let options: BTreeMap<String, String> = SiteOptionRepo::list(&state.pool)
        .await?
        .into_iter()
        .filter(|o| is_public_option(&o.option_key))
        .map(|o| (o.option_key, o.option_value))
        .collect();
    Ok(Json(DataResponse { data: options }))
}

/// GET /api/v1/public/translations/{locale}
pub async fn translations(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> AppResult<Json<DataResponse<BTreeMap<String, String>>>> {
    validate_locale(&locale)?;
    let strings = TranslationRepo::list_by_locale(&state.pool, &locale).await?;
    Ok(Json(DataResponse { data: strings }))
}

/// GET /api/v1/public/categories
pub async fn categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

#[derive(Debug, Deserialize)]
pub struct PublicProductQuery {
    pub category_id: Option<DbId>,
}

/// GET /api/v1/public/products?category_id=
///
/// Published products only.
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<PublicProductQuery>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let filter = ProductFilter {
        category_id: query.category_id,
        published_only: Some(true),
    };
    let products = ProductRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/public/products/{slug}
pub async fn product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    Ok(Json(DataResponse { data: product }))
}

/// GET /api/v1/public/homepage
///
/// Visible sections in display order.
pub async fn homepage(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<HomepageSection>>>> {
    let sections = HomepageSectionRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse { data: sections }))
}
