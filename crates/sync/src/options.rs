//! Knobs for dumps and syncs.

use serde::{Deserialize, Serialize};

use crate::rewrite::UrlRewrite;

/// Rows fetched per `SELECT` page when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// How data rows meet existing rows on the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    /// Tables are dropped and recreated, so the target ends up identical to
    /// the source.
    #[default]
    Overwrite,
    /// Tables are kept; rows are upserted by primary or unique key.
    Append,
}

/// What a sync copies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    #[default]
    Full,
    StructureOnly,
}

/// Which way data flows relative to this installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    /// Remote into local.
    Pull,
    /// Local into remote.
    Push,
}

impl SyncDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncDirection::Pull => "pull",
            SyncDirection::Push => "push",
        }
    }
}

/// Controls what [`crate::dump::dump_database`] emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpOptions {
    /// Restrict the dump to these tables. `None` means every base table.
    pub tables: Option<Vec<String>>,
    pub include_structure: bool,
    pub include_data: bool,
    /// Emit `DROP TABLE IF EXISTS` before each `CREATE TABLE`. Only honored
    /// in [`DataMode::Overwrite`].
    pub drop_tables: bool,
    pub data_mode: DataMode,
    pub page_size: u32,
    pub url_rewrite: Option<UrlRewrite>,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            tables: None,
            include_structure: true,
            include_data: true,
            drop_tables: true,
            data_mode: DataMode::Overwrite,
            page_size: DEFAULT_PAGE_SIZE,
            url_rewrite: None,
        }
    }
}

impl DumpOptions {
    /// Whether the structure section should start with `DROP TABLE`.
    pub fn drops_tables(&self) -> bool {
        self.include_structure && self.drop_tables && self.data_mode == DataMode::Overwrite
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}

/// Body of a pull/push request from the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    #[serde(default = "default_true")]
    pub create_backup: bool,
    #[serde(default)]
    pub sync_mode: SyncMode,
    #[serde(default)]
    pub data_mode: DataMode,
}

fn default_true() -> bool {
    true
}

impl Default for SyncRequest {
    fn default() -> Self {
        Self {
            create_backup: true,
            sync_mode: SyncMode::Full,
            data_mode: DataMode::Overwrite,
        }
    }
}

impl SyncRequest {
    /// The dump settings for the source side of this sync.
    pub fn dump_options(&self, page_size: u32, url_rewrite: Option<UrlRewrite>) -> DumpOptions {
        DumpOptions {
            tables: None,
            include_structure: true,
            include_data: self.sync_mode == SyncMode::Full,
            drop_tables: self.data_mode == DataMode::Overwrite,
            data_mode: self.data_mode,
            page_size,
            url_rewrite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_request_defaults_from_empty_body() {
        let req: SyncRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, SyncRequest::default());
        assert!(req.create_backup);
    }

    #[test]
    fn sync_request_parses_snake_case_modes() {
        let req: SyncRequest = serde_json::from_str(
            r#"{"create_backup":false,"sync_mode":"structure_only","data_mode":"append"}"#,
        )
        .unwrap();
        assert!(!req.create_backup);
        assert_eq!(req.sync_mode, SyncMode::StructureOnly);
        assert_eq!(req.data_mode, DataMode::Append);
    }

    #[test]
    fn structure_only_sync_dumps_no_data() {
        let req = SyncRequest {
            create_backup: true,
            sync_mode: SyncMode::StructureOnly,
            data_mode: DataMode::Overwrite,
        };
        let opts = req.dump_options(100, None);
        assert!(opts.include_structure);
        assert!(!opts.include_data);
        assert!(opts.drops_tables());
    }

    #[test]
    fn append_never_drops_tables() {
        let opts = DumpOptions {
            drop_tables: true,
            data_mode: DataMode::Append,
            ..DumpOptions::default()
        };
        assert!(!opts.drops_tables());
    }

    #[test]
    fn page_size_is_at_least_one() {
        let opts = DumpOptions {
            page_size: 0,
            ..DumpOptions::default()
        };
        assert_eq!(opts.effective_page_size(), 1);
    }
}
