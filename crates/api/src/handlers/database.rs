//! Handlers for the `/admin/database` tools: remote connection settings,
//! export, import, and pull/push between the local and remote databases.
//!
//! Import, pull and push stream newline-delimited JSON [`SyncEvent`]s while
//! they run. Only one of them may run at a time; a second request gets 409.
//!
//! [`SyncEvent`]: vitrine_sync::progress::SyncEvent

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::future::Future;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::{mpsc, OwnedMutexGuard};
use tokio_stream::wrappers::UnboundedReceiverStream;
use vitrine_core::error::CoreError;
use vitrine_core::site_option::{is_masked_echo, is_secret_key, mask_secrets, REMOTE_DB_KEYS};
use vitrine_db::repositories::SiteOptionRepo;
use vitrine_sync::backup::{create_backup, list_backups, BackupFile};
use vitrine_sync::connection::{test_connection, RemoteDbConfig, ServerInfo};
use vitrine_sync::dump::dump_database;
use vitrine_sync::executor::execute_script;
use vitrine_sync::options::{DataMode, DumpOptions, SyncDirection, SyncRequest};
use vitrine_sync::orchestrator::{open_remote, run_sync, url_rewrite_for};
use vitrine_sync::progress::{CompletionStatus, ProgressReporter};
use vitrine_sync::{schema, SyncError};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

// ---------------------------------------------------------------------------
// Streaming helpers
// ---------------------------------------------------------------------------

/// Run `job` on a background task and stream its events as NDJSON.
///
/// The sync lock guard moves into the task so it is held until the job
/// finishes, even if the client disconnects.
fn stream_job<F, Fut>(guard: OwnedMutexGuard<()>, job: F) -> Response
where
    F: FnOnce(ProgressReporter) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let reporter = ProgressReporter::new(tx);

    tokio::spawn(async move {
        let _guard = guard;
        job(reporter).await;
    });

    let lines = UnboundedReceiverStream::new(rx)
        .map(|event| Ok::<_, Infallible>(event.to_ndjson_line()));

    (
        [(CONTENT_TYPE, NDJSON_CONTENT_TYPE), (CACHE_CONTROL, "no-cache")],
        Body::from_stream(lines),
    )
        .into_response()
}

/// Terminal event for a job that failed outright.
fn report_failure(reporter: &ProgressReporter, operation: &str, err: &SyncError) {
    tracing::error!(operation, error = %err, "Database operation failed");
    reporter.error(err.to_string());

    let mut summary = json!({ "message": err.to_string() });
    if let SyncError::Connection { suggestions, .. } = err {
        summary["suggestions"] = json!(suggestions);
    }
    reporter.complete(CompletionStatus::Error, summary);
}

// ---------------------------------------------------------------------------
// Remote connection settings
// ---------------------------------------------------------------------------

/// The remote connection settings with the password masked.
async fn masked_remote_config(state: &AppState) -> AppResult<BTreeMap<String, String>> {
    let mut options = SiteOptionRepo::get_many(&state.pool, REMOTE_DB_KEYS).await?;
    mask_secrets(&mut options);
    Ok(options)
}

/// Keep only remote connection keys, dropping a masked password echo.
/// Values are trimmed except the password, which is stored as sent.
fn remote_config_changes(
    input: BTreeMap<String, String>,
) -> AppResult<BTreeMap<String, String>> {
    let mut changes = BTreeMap::new();
    for (key, value) in input {
        if !REMOTE_DB_KEYS.contains(&key.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unknown connection setting '{key}'. Expected one of: {}",
                REMOTE_DB_KEYS.join(", ")
            ))
            .into());
        }
        let value = if is_secret_key(&key) {
            if is_masked_echo(&value) {
                continue;
            }
            value
        } else {
            value.trim().to_string()
        };
        changes.insert(key, value);
    }
    Ok(changes)
}

/// GET /api/v1/admin/database/config
pub async fn get_config(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BTreeMap<String, String>>>> {
    let config = masked_remote_config(&state).await?;
    Ok(Json(DataResponse { data: config }))
}

/// PUT /api/v1/admin/database/config
///
/// Saves the connection settings to `site_options`. Sending the masked
/// password back keeps the stored one.
pub async fn update_config(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BTreeMap<String, String>>,
) -> AppResult<Json<DataResponse<BTreeMap<String, String>>>> {
    let changes = remote_config_changes(input)?;
    SiteOptionRepo::set_many(&state.pool, &changes).await?;
    tracing::info!(
        user_id = admin.user_id,
        keys = ?changes.keys().collect::<Vec<_>>(),
        "Remote database settings saved",
    );

    let config = masked_remote_config(&state).await?;
    Ok(Json(DataResponse { data: config }))
}

/// POST /api/v1/admin/database/test-connection
///
/// Tests the stored settings overlaid with any values in the body, so the
/// form can be checked before saving. Send `{}` to test what is stored.
pub async fn test_remote(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BTreeMap<String, String>>,
) -> AppResult<Json<DataResponse<ServerInfo>>> {
    let mut options = SiteOptionRepo::get_many(&state.pool, REMOTE_DB_KEYS).await?;
    options.extend(remote_config_changes(input)?);

    let config = RemoteDbConfig::from_options(&options)?;
    let info = test_connection(&config).await?;
    Ok(Json(DataResponse { data: info }))
}

// ---------------------------------------------------------------------------
// Local inspection
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub rows: i64,
}

/// GET /api/v1/admin/database/tables
pub async fn list_tables(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TableInfo>>>> {
    let mut conn = state.pool.acquire().await?;
    let names = schema::list_tables(&mut conn).await?;

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let rows = schema::row_count(&mut conn, &name).await?;
        tables.push(TableInfo { name, rows });
    }
    Ok(Json(DataResponse { data: tables }))
}

/// GET /api/v1/admin/database/backups
pub async fn backups(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<BackupFile>>>> {
    let files = list_backups(&state.config.backup_dir).await?;
    Ok(Json(DataResponse { data: files }))
}

// ---------------------------------------------------------------------------
// Export / import
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Request body for `POST /admin/database/export`.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    /// Tables to export; every table when absent.
    #[serde(default)]
    pub tables: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub include_structure: bool,
    #[serde(default = "default_true")]
    pub include_data: bool,
    #[serde(default = "default_true")]
    pub drop_tables: bool,
    #[serde(default)]
    pub data_mode: DataMode,
    /// Rewrite this site's URL to the configured production URL, producing a
    /// file ready to load on the live server.
    #[serde(default)]
    pub for_production: bool,
}

/// POST /api/v1/admin/database/export
///
/// Returns the dump as an `application/sql` attachment.
pub async fn export(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ExportRequest>,
) -> AppResult<impl IntoResponse> {
    let url_rewrite = if input.for_production {
        let production_url =
            SiteOptionRepo::get(&state.pool, vitrine_core::site_option::KEY_PRODUCTION_URL)
                .await?
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| {
                    CoreError::Validation("No production URL is configured".into())
                })?;
        url_rewrite_for(
            SyncDirection::Push,
            &state.config.site_url,
            Some(&production_url),
        )
    } else {
        None
    };

    let options = DumpOptions {
        tables: input.tables,
        include_structure: input.include_structure,
        include_data: input.include_data,
        drop_tables: input.drop_tables,
        data_mode: input.data_mode,
        page_size: state.config.dump_page_size,
        url_rewrite,
    };

    let dump = dump_database(&state.pool, &options, &ProgressReporter::silent()).await?;
    tracing::info!(
        user_id = admin.user_id,
        tables = dump.tables.len(),
        rows = dump.total_rows(),
        statements = dump.statement_count,
        table_errors = dump.errors.len(),
        "Database exported",
    );

    let file_name = format!("export_{}.sql", Utc::now().format("%Y%m%d_%H%M%S"));
    Ok((
        [
            (CONTENT_TYPE, "application/sql; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        dump.sql,
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportParams {
    /// Snapshot the local database before executing the script.
    #[serde(default)]
    pub create_backup: bool,
}

/// POST /api/v1/admin/database/import?create_backup=
///
/// Executes the SQL script in the request body against the local database,
/// streaming progress. Failing statements are reported and skipped.
pub async fn import(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    body: String,
) -> AppResult<Response> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation("The SQL script is empty".into()).into());
    }
    let guard = state.sync_lock.try_acquire()?;
    tracing::info!(user_id = admin.user_id, bytes = body.len(), "Starting SQL import");

    let pool = state.pool.clone();
    let backup_dir = state.config.backup_dir.clone();

    Ok(stream_job(guard, move |reporter| async move {
        let backup_path = if params.create_backup {
            reporter.progress("backup", 0, "Backing up the local database");
            match create_backup(&pool, &backup_dir, "local", &ProgressReporter::silent()).await {
                Ok(path) => {
                    reporter.info(format!("Backup saved to {}", path.display()));
                    Some(path.display().to_string())
                }
                Err(e) => return report_failure(&reporter, "import", &e),
            }
        } else {
            None
        };

        reporter.progress("execute", 10, "Executing SQL statements");
        match execute_script(&pool, &body, &reporter).await {
            Ok(report) => {
                let status = if report.is_clean() {
                    CompletionStatus::Success
                } else {
                    CompletionStatus::Partial
                };
                reporter.progress("done", 100, "Import finished");
                reporter.complete(
                    status,
                    json!({ "backup_path": backup_path, "report": report }),
                );
            }
            Err(e) => report_failure(&reporter, "import", &e),
        }
    }))
}

// ---------------------------------------------------------------------------
// Pull / push
// ---------------------------------------------------------------------------

/// Validate the remote settings, connect, then stream the sync.
///
/// Configuration and connection problems are returned as plain error
/// responses (400 / 500 with suggestions) before any streaming starts.
async fn start_sync(
    state: AppState,
    direction: SyncDirection,
    request: SyncRequest,
) -> AppResult<Response> {
    let guard = state.sync_lock.try_acquire()?;
    let (config, remote) = open_remote(&state.pool).await?;
    let settings = state.sync_settings();
    let local = state.pool.clone();

    Ok(stream_job(guard, move |reporter| async move {
        reporter.info(format!(
            "Connected to {}@{}:{}/{}",
            config.username, config.host, config.port, config.database
        ));

        let result = run_sync(
            &local,
            &remote,
            config.production_url.as_deref(),
            direction,
            &request,
            &settings,
            &reporter,
        )
        .await;
        remote.close().await;

        match result {
            Ok(summary) => {
                let value = serde_json::to_value(&summary).unwrap_or_default();
                reporter.complete(summary.status(), value);
            }
            Err(e) => report_failure(&reporter, direction.as_str(), &e),
        }
    }))
}

/// POST /api/v1/admin/database/pull
///
/// Replace or merge the local database with the remote one.
pub async fn pull(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> AppResult<Response> {
    tracing::info!(user_id = admin.user_id, ?request, "Pull requested");
    start_sync(state, SyncDirection::Pull, request).await
}

/// POST /api/v1/admin/database/push
///
/// Replace or merge the remote database with the local one.
pub async fn push(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> AppResult<Response> {
    tracing::info!(user_id = admin.user_id, ?request, "Push requested");
    start_sync(state, SyncDirection::Push, request).await
}
