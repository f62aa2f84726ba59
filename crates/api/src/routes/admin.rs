//! Route definitions for the content management endpoints under `/admin`.
//!
//! Content handlers require a signed-in user (admin or editor); the nested
//! database tools require the admin role.

use axum::routing::{get, put};
use axum::Router;

use super::database;
use crate::handlers::{category, homepage, product, quote, site_option, translation};
use crate::state::AppState;

/// Routes mounted at `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        // Catalog.
        .route("/categories", get(category::list).post(category::create))
        .route(
            "/categories/{id}",
            get(category::get_by_id)
                .put(category::update)
                .delete(category::delete),
        )
        .route("/categories/{id}/products", get(category::list_products))
        .route("/products", get(product::list).post(product::create))
        .route(
            "/products/{id}",
            get(product::get_by_id)
                .put(product::update)
                .delete(product::delete),
        )
        // Quote pipeline.
        .route("/quotes", get(quote::list))
        .route("/quotes/counts", get(quote::counts))
        .route("/quotes/{id}", get(quote::get_by_id).delete(quote::delete))
        .route("/quotes/{id}/status", put(quote::update_status))
        .route("/quotes/{id}/notes", put(quote::update_notes))
        // Settings.
        .route(
            "/options",
            get(site_option::list).put(site_option::update_many),
        )
        .route(
            "/options/{key}",
            put(site_option::set_one).delete(site_option::delete),
        )
        // Homepage builder.
        .route(
            "/homepage-sections",
            get(homepage::list).post(homepage::create),
        )
        .route("/homepage-sections/reorder", put(homepage::reorder))
        .route(
            "/homepage-sections/{id}",
            get(homepage::get_by_id)
                .put(homepage::update)
                .delete(homepage::delete),
        )
        // Translations.
        .route(
            "/translations",
            get(translation::list).put(translation::upsert),
        )
        .route("/translations/locales", get(translation::locales))
        .route(
            "/translations/{id}",
            axum::routing::delete(translation::delete),
        )
        // Database tools (admin role).
        .nest("/database", database::router())
}
