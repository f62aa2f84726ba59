//! Route definitions for the `/admin/database` tools (admin role only).

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::database;
use crate::state::AppState;

/// Largest SQL script accepted by `/import`.
const MAX_IMPORT_BYTES: usize = 256 * 1024 * 1024;

/// Routes mounted at `/admin/database`.
///
/// ```text
/// GET  /config            -> get_config
/// PUT  /config            -> update_config
/// POST /test-connection   -> test_remote
/// GET  /tables            -> list_tables
/// GET  /backups           -> backups
/// POST /export            -> export
/// POST /import            -> import (NDJSON stream)
/// POST /pull              -> pull (NDJSON stream)
/// POST /push              -> push (NDJSON stream)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/config",
            get(database::get_config).put(database::update_config),
        )
        .route("/test-connection", post(database::test_remote))
        .route("/tables", get(database::list_tables))
        .route("/backups", get(database::backups))
        .route("/export", post(database::export))
        .route(
            "/import",
            post(database::import).layer(DefaultBodyLimit::max(MAX_IMPORT_BYTES)),
        )
        .route("/pull", post(database::pull))
        .route("/push", post(database::push))
}
