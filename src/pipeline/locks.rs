//! Per-URL mutual exclusion

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Async locks keyed by URL
///
/// Holding the guard for a URL serializes every pipeline run for that URL,
/// so image deletion and re-creation of one run never interleaves with
/// another. Entries nobody holds or waits on are pruned on each acquisition.
#[derive(Debug, Default)]
pub struct UrlLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl UrlLocks {
    /// Wait for and take the lock for `key`
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(key.to_string()).or_default().clone()
        };

        lock.lock_owned().await
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no key is tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
