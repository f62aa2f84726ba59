//! Handlers for quote requests: public submission and the admin pipeline.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use vitrine_core::error::CoreError;
use vitrine_core::quote::{validate_submission, QuoteStatus, QuoteSubmission};
use vitrine_core::types::DbId;
use vitrine_db::models::quote_request::{
    QuoteFilter, QuoteRequest, UpdateQuoteNotes, UpdateQuoteStatus,
};
use vitrine_db::repositories::QuoteRequestRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "QuoteRequest",
        id,
    })
}

/// POST /api/v1/quotes
///
/// Public quote submission. Missing or malformed `name`/`email` and bad
/// items are rejected with 400 before anything is stored.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<QuoteSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<QuoteRequest>>)> {
    let submission = validate_submission(input)?;
    let quote = QuoteRequestRepo::create(&state.pool, &submission).await?;
    tracing::info!(
        quote_id = quote.id,
        items = quote.items.len(),
        "Quote request received",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: quote })))
}

/// GET /api/v1/admin/quotes?status=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<QuoteFilter>,
) -> AppResult<Json<DataResponse<Vec<QuoteRequest>>>> {
    let quotes = match filter.status.as_deref() {
        Some(status) => {
            let status: QuoteStatus = status.parse()?;
            QuoteRequestRepo::list_by_status(&state.pool, status).await?
        }
        None => QuoteRequestRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: quotes }))
}

#[derive(Debug, Serialize)]
pub struct QuoteCounts {
    pub new: i64,
}

/// GET /api/v1/admin/quotes/counts
///
/// Badge count for the admin navigation.
pub async fn counts(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<QuoteCounts>>> {
    let new = QuoteRequestRepo::count_new(&state.pool).await?;
    Ok(Json(DataResponse {
        data: QuoteCounts { new },
    }))
}

/// GET /api/v1/admin/quotes/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuoteRequest>>> {
    let quote = QuoteRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: quote }))
}

/// PUT /api/v1/admin/quotes/{id}/status
pub async fn update_status(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuoteStatus>,
) -> AppResult<Json<DataResponse<QuoteRequest>>> {
    let status: QuoteStatus = input.status.parse()?;
    let quote = QuoteRequestRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(quote_id = id, %status, user_id = user.user_id, "Quote status changed");
    Ok(Json(DataResponse { data: quote }))
}

/// PUT /api/v1/admin/quotes/{id}/notes
pub async fn update_notes(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuoteNotes>,
) -> AppResult<Json<DataResponse<QuoteRequest>>> {
    let notes = input
        .admin_notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let quote = QuoteRequestRepo::update_notes(&state.pool, id, notes)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: quote }))
}

/// DELETE /api/v1/admin/quotes/{id}
pub async fn delete(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if QuoteRequestRepo::delete(&state.pool, id).await? {
        tracing::info!(quote_id = id, "Quote request deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
