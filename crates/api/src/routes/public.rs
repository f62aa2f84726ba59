//! Route definitions for the unauthenticated `/public` endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET /options                  -> options
/// GET /translations/{locale}    -> translations
/// GET /categories               -> categories
/// GET /products                 -> products
/// GET /products/{slug}          -> product_by_slug
/// GET /homepage                 -> homepage
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/options", get(public::options))
        .route("/translations/{locale}", get(public::translations))
        .route("/categories", get(public::categories))
        .route("/products", get(public::products))
        .route("/products/{slug}", get(public::product_by_slug))
        .route("/homepage", get(public::homepage))
}
