/// Errors raised by the dump/restore engine.
///
/// Per-table and per-statement failures are not errors at this level: they
/// are collected into reports so a run can continue past them.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or malformed remote connection settings.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The remote server could not be reached or refused the login.
    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        suggestions: Vec<String>,
    },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Another import or sync is already running")]
    Busy,
}

pub type SyncResult<T> = Result<T, SyncError>;
