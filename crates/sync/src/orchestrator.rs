//! Pull and push between the local and remote databases.
//!
//! A sync backs up the target (optional), dumps the source with base URLs
//! rewritten for the other side, then replays the dump on the target.
//!
//! Every table is copied, `site_options` and `admin_users` included. A pull
//! therefore replaces the local admin accounts with the remote ones; sign in
//! with a remote account afterwards. The local remote-connection settings
//! (`cpanel_db_*`, `production_url`) are the exception: they are read before
//! a pull and written back after it, so the install keeps pointing at the
//! same server.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use sqlx::MySqlPool;
use vitrine_core::site_option::REMOTE_DB_KEYS;
use vitrine_db::repositories::SiteOptionRepo;

use crate::backup::create_backup;
use crate::connection::{self, RemoteDbConfig};
use crate::dump::{dump_database, TableDump, TableError};
use crate::error::SyncResult;
use crate::executor::{execute_script, ExecutionReport};
use crate::options::{DataMode, SyncDirection, SyncMode, SyncRequest};
use crate::progress::{CompletionStatus, ProgressReporter};
use crate::rewrite::UrlRewrite;

/// Installation-level settings a sync needs.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Base URL of this (local) site.
    pub site_url: String,
    pub backup_dir: PathBuf,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub direction: SyncDirection,
    pub sync_mode: SyncMode,
    pub data_mode: DataMode,
    pub backup_path: Option<String>,
    pub tables: Vec<TableDump>,
    pub rows: u64,
    pub url_replacements: usize,
    pub table_errors: Vec<TableError>,
    pub report: ExecutionReport,
}

impl SyncSummary {
    pub fn status(&self) -> CompletionStatus {
        if self.table_errors.is_empty() && self.report.is_clean() {
            CompletionStatus::Success
        } else {
            CompletionStatus::Partial
        }
    }
}

/// The rewrite that moves content from one side to the other, if any.
pub fn url_rewrite_for(
    direction: SyncDirection,
    site_url: &str,
    production_url: Option<&str>,
) -> Option<UrlRewrite> {
    let production_url = production_url?;
    let rewrite = match direction {
        SyncDirection::Push => UrlRewrite::new(site_url, production_url),
        SyncDirection::Pull => UrlRewrite::new(production_url, site_url),
    };
    (!rewrite.is_noop()).then_some(rewrite)
}

/// Load the remote settings from `site_options` and open a pool to the
/// remote database.
///
/// Incomplete settings fail with `InvalidConfig`, unreachable servers with
/// `Connection` (carrying suggestions), before anything is modified.
pub async fn open_remote(local: &MySqlPool) -> SyncResult<(RemoteDbConfig, MySqlPool)> {
    let config = RemoteDbConfig::load(local).await?;
    let remote = connection::connect(&config).await?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "Connected to remote database",
    );
    Ok((config, remote))
}

/// Copy `local` to `remote` (push) or `remote` to `local` (pull).
pub async fn run_sync(
    local: &MySqlPool,
    remote: &MySqlPool,
    production_url: Option<&str>,
    direction: SyncDirection,
    request: &SyncRequest,
    settings: &SyncSettings,
    reporter: &ProgressReporter,
) -> SyncResult<SyncSummary> {
    let (source, target, target_label) = match direction {
        SyncDirection::Pull => (remote, local, "local"),
        SyncDirection::Push => (local, remote, "remote"),
    };
    tracing::info!(
        direction = direction.as_str(),
        sync_mode = ?request.sync_mode,
        data_mode = ?request.data_mode,
        "Starting sync",
    );

    let backup_path = if request.create_backup {
        reporter.progress("backup", 5, format!("Backing up the {target_label} database"));
        let path = create_backup(
            target,
            &settings.backup_dir,
            target_label,
            &ProgressReporter::silent(),
        )
        .await?;
        reporter.info(format!("Backup saved to {}", path.display()));
        Some(path.display().to_string())
    } else {
        reporter.warn("Skipping backup of the target database");
        None
    };

    let rewrite = url_rewrite_for(direction, &settings.site_url, production_url);
    match &rewrite {
        Some(r) => reporter.info(format!("Rewriting URLs {} -> {}", r.from, r.to)),
        None if production_url.is_none() => {
            reporter.info("No production URL configured; URLs are left unchanged")
        }
        None => {}
    }

    reporter.progress("dump", 20, "Exporting the source database");
    let options = request.dump_options(settings.page_size, rewrite);
    let dump = dump_database(source, &options, reporter).await?;
    reporter.info(format!(
        "Exported {} tables ({} rows, {} statements)",
        dump.tables.len(),
        dump.total_rows(),
        dump.statement_count
    ));

    let kept_settings = match direction {
        SyncDirection::Pull => SiteOptionRepo::get_many(local, REMOTE_DB_KEYS).await?,
        SyncDirection::Push => BTreeMap::new(),
    };

    reporter.progress("execute", 60, "Applying to the target database");
    let report = execute_script(target, &dump.sql, reporter).await?;

    if !kept_settings.is_empty() {
        restore_connection_settings(local, &kept_settings, reporter).await;
    }

    let summary = SyncSummary {
        direction,
        sync_mode: request.sync_mode,
        data_mode: request.data_mode,
        backup_path,
        rows: dump.total_rows(),
        url_replacements: dump.url_replacements,
        tables: dump.tables,
        table_errors: dump.errors,
        report,
    };
    reporter.progress("done", 100, "Sync finished");
    tracing::info!(
        direction = direction.as_str(),
        tables = summary.tables.len(),
        rows = summary.rows,
        errored = summary.report.errored,
        "Sync finished",
    );
    Ok(summary)
}

/// Write the local remote-connection settings back after a pull. A failure
/// is reported but does not fail the sync, since the data is already applied.
async fn restore_connection_settings(
    local: &MySqlPool,
    settings: &BTreeMap<String, String>,
    reporter: &ProgressReporter,
) {
    match SiteOptionRepo::set_many(local, settings).await {
        Ok(()) => reporter.info("Kept the local remote database settings"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to restore remote database settings");
            reporter.warn(format!(
                "Could not restore the remote database settings: {e}. Re-enter them."
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rewrites_local_to_production() {
        let r = url_rewrite_for(
            SyncDirection::Push,
            "http://localhost:8080",
            Some("https://www.example.com/"),
        )
        .unwrap();
        assert_eq!(r.from, "http://localhost:8080");
        assert_eq!(r.to, "https://www.example.com");
    }

    #[test]
    fn pull_rewrites_production_to_local() {
        let r = url_rewrite_for(
            SyncDirection::Pull,
            "http://localhost:8080",
            Some("https://www.example.com"),
        )
        .unwrap();
        assert_eq!(r.from, "https://www.example.com");
        assert_eq!(r.to, "http://localhost:8080");
    }

    #[test]
    fn no_production_url_means_no_rewrite() {
        assert!(url_rewrite_for(SyncDirection::Push, "http://localhost:8080", None).is_none());
        assert!(url_rewrite_for(
            SyncDirection::Push,
            "https://www.example.com",
            Some("https://www.example.com/")
        )
        .is_none());
    }

    #[test]
    fn summary_status_reflects_failures() {
        let mut summary = SyncSummary {
            direction: SyncDirection::Pull,
            sync_mode: SyncMode::Full,
            data_mode: DataMode::Overwrite,
            backup_path: None,
            tables: Vec::new(),
            rows: 0,
            url_replacements: 0,
            table_errors: Vec::new(),
            report: ExecutionReport::default(),
        };
        assert_eq!(summary.status(), CompletionStatus::Success);
        summary.report.errored = 1;
        assert_eq!(summary.status(), CompletionStatus::Partial);
    }
}
