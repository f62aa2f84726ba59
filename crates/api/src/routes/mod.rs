pub mod admin;
pub mod database;
pub mod health;
pub mod public;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current session
///
/// /quotes                                          submit a quote request (public)
///
/// /public/options                                  non-secret site options
/// /public/translations/{locale}                    strings for one locale
/// /public/categories                               category list
/// /public/products                                 published products
/// /public/products/{slug}                          one published product
/// /public/homepage                                 visible homepage sections
///
/// /admin/categories                                list, create
/// /admin/categories/{id}                           get, update, delete
/// /admin/categories/{id}/products                  products in a category
/// /admin/products                                  list, create
/// /admin/products/{id}                             get, update, delete
/// /admin/quotes                                    list (?status=)
/// /admin/quotes/counts                             count of new requests
/// /admin/quotes/{id}                               get, delete
/// /admin/quotes/{id}/status                        change status (PUT)
/// /admin/quotes/{id}/notes                         replace admin notes (PUT)
/// /admin/options                                   list, bulk save (PUT)
/// /admin/options/{key}                             set (PUT), delete
/// /admin/homepage-sections                         list, create
/// /admin/homepage-sections/reorder                 reorder (PUT)
/// /admin/homepage-sections/{id}                    get, update, delete
/// /admin/translations                              list, upsert (PUT)
/// /admin/translations/locales                      locales in use
/// /admin/translations/{id}                         delete
///
/// /admin/database/config                           get, save (admin only)
/// /admin/database/test-connection                  test remote connection (POST)
/// /admin/database/tables                           local tables with row counts
/// /admin/database/backups                          backup files
/// /admin/database/export                           download SQL dump (POST)
/// /admin/database/import                           run SQL script, NDJSON (POST)
/// /admin/database/pull                             remote -> local, NDJSON (POST)
/// /admin/database/push                             local -> remote, NDJSON (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    let session = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me));

    Router::new()
        .nest("/auth", session)
        .route("/quotes", post(handlers::quote::submit))
        .nest("/public", public::router())
        .nest("/admin", admin::router())
}
