use std::sync::Arc;

use vitrine_sync::lock::SyncLock;
use vitrine_sync::orchestrator::SyncSettings;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Local database connection pool.
    pub pool: vitrine_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Held for the duration of an import, pull or push.
    pub sync_lock: SyncLock,
}

impl AppState {
    pub fn new(pool: vitrine_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            sync_lock: SyncLock::new(),
        }
    }

    /// Sync settings derived from the server configuration.
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            site_url: self.config.site_url.clone(),
            backup_dir: self.config.backup_dir.clone(),
            page_size: self.config.dump_page_size,
        }
    }
}
