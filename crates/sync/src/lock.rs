//! Process-wide guard so only one import or sync touches a database at a time.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{SyncError, SyncResult};

#[derive(Debug, Clone, Default)]
pub struct SyncLock(Arc<Mutex<()>>);

impl SyncLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock without waiting. Returns [`SyncError::Busy`] while
    /// another run holds it; the guard releases on drop.
    pub fn try_acquire(&self) -> SyncResult<OwnedMutexGuard<()>> {
        self.0.clone().try_lock_owned().map_err(|_| SyncError::Busy)
    }

    /// Whether an import or sync is running right now.
    pub fn is_held(&self) -> bool {
        self.0.try_lock().is_err()
    }
}
