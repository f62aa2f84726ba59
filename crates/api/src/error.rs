use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vitrine_core::error::CoreError;
use vitrine_sync::SyncError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`SyncError`] for the database
/// tools, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce the `{ "status": "error", ... }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vitrine_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure in the dump/restore engine.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut suggestions: Option<Vec<String>> = None;

        let (status, code, message) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(&err),

            // --- Sync engine errors ---
            AppError::Sync(err) => match err {
                SyncError::InvalidConfig(msg) => (StatusCode::BAD_REQUEST, "INVALID_CONFIG", msg),
                SyncError::Busy => (
                    StatusCode::CONFLICT,
                    "SYNC_IN_PROGRESS",
                    SyncError::Busy.to_string(),
                ),
                SyncError::Connection {
                    message,
                    suggestions: hints,
                } => {
                    suggestions = Some(hints);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONNECTION_FAILED",
                        format!("Could not connect to the remote database: {message}"),
                    )
                }
                SyncError::TableNotFound(table) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Table {table} not found"),
                ),
                SyncError::Database(err) => classify_sqlx_error(&err),
                other => {
                    tracing::error!(error = %other, "Sync error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "status": "error",
            "message": message,
            "code": code,
        });
        if let Some(suggestions) = suggestions {
            body["suggestions"] = json!(suggestions);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Duplicate key (MySQL 1062) maps to 409.
/// - Foreign key violations map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "A record with the same unique value already exists".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "The record references, or is referenced by, another record".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
