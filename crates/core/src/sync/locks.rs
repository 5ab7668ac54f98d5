//! Per-item advisory locks.
//!
//! The scheduled sync and the webhook-driven reconciliation can both target
//! the same `external_item_id`; a keyed async mutex serializes their merge
//! and status critical sections.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Keyed async mutexes, one per external item id.
#[derive(Default)]
pub struct ItemLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ItemLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `external_item_id`, waiting if another task holds
    /// it. The guard releases on drop.
    pub async fn lock(&self, external_item_id: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.inner.lock().unwrap_or_else(|poisoned| {
                // A panic while only cloning an Arc cannot corrupt the map.
                poisoned.into_inner()
            });
            Arc::clone(
                map.entry(external_item_id.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        entry.lock_owned().await
    }
}
