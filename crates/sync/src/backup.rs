//! Snapshots written to disk before a destructive sync.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::MySqlPool;

use crate::dump::dump_database;
use crate::error::SyncResult;
use crate::options::DumpOptions;
use crate::progress::ProgressReporter;

const BACKUP_PREFIX: &str = "backup_";
const BACKUP_EXTENSION: &str = "sql";

/// A backup file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupFile {
    pub file_name: String,
    pub size_bytes: u64,
    pub modified_at: Option<DateTime<Utc>>,
}

/// `backup_<label>_<YYYYmmdd_HHMMSS>.sql`, with the label reduced to
/// filename-safe characters.
pub fn backup_file_name(label: &str, at: DateTime<Utc>) -> String {
    let label: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let label = if label.is_empty() { "database".to_string() } else { label };
    format!(
        "{BACKUP_PREFIX}{label}_{}.{BACKUP_EXTENSION}",
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Dump the full structure and data of `pool`'s database into `dir`.
///
/// The directory is created if missing. Returns the path written.
pub async fn create_backup(
    pool: &MySqlPool,
    dir: &Path,
    label: &str,
    reporter: &ProgressReporter,
) -> SyncResult<PathBuf> {
    let dump = dump_database(pool, &DumpOptions::default(), reporter).await?;

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(backup_file_name(label, Utc::now()));
    tokio::fs::write(&path, dump.sql.as_bytes()).await?;

    tracing::info!(
        path = %path.display(),
        tables = dump.tables.len(),
        rows = dump.total_rows(),
        "Backup written",
    );
    Ok(path)
}

/// Backup files in `dir`, newest first. A missing directory yields an
/// empty list.
pub async fn list_backups(dir: &Path) -> SyncResult<Vec<BackupFile>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut backups = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !is_backup_file_name(&file_name) {
            continue;
        }
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        backups.push(BackupFile {
            file_name,
            size_bytes: metadata.len(),
            modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
        });
    }

    // Names embed the timestamp, so they break ties between equal mtimes.
    backups.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| b.file_name.cmp(&a.file_name))
    });
    Ok(backups)
}

fn is_backup_file_name(name: &str) -> bool {
    name.starts_with(BACKUP_PREFIX)
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext == BACKUP_EXTENSION)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn file_name_embeds_label_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 14, 5, 9).unwrap();
        assert_eq!(backup_file_name("local", at), "backup_local_20260301_140509.sql");
        assert_eq!(
            backup_file_name("shop db/prod", at),
            "backup_shop_db_prod_20260301_140509.sql"
        );
        assert_eq!(backup_file_name("", at), "backup_database_20260301_140509.sql");
    }

    #[tokio::test]
    async fn lists_only_backup_files_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "backup_local_20260101_000000.sql",
            "backup_remote_20260102_000000.sql",
            "notes.txt",
            "backup_local.txt",
        ] {
            tokio::fs::write(dir.path().join(name), b"-- dump\n").await.unwrap();
        }

        let backups = list_backups(dir.path()).await.unwrap();
        let names: Vec<&str> = backups.iter().map(|b| b.file_name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"backup_local_20260101_000000.sql"));
        assert!(names.contains(&"backup_remote_20260102_000000.sql"));
        assert!(backups.iter().all(|b| b.size_bytes == 8));
    }

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let backups = list_backups(&dir.path().join("nope")).await.unwrap();
        assert!(backups.is_empty());
    }
}
