//! Root-level liveness endpoint used by the hosting panel and uptime checks.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when the local database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// An import, pull or push currently holds the sync lock.
    pub sync_running: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = vitrine_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check could not reach the local database");
    }

    Json(HealthReport {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        sync_running: state.sync_lock.is_held(),
    })
}

/// `GET /health`, mounted outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
