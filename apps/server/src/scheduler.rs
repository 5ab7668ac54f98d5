//! In-process schedule for the batch sync job.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::task::JoinHandle;
use tracing::info;

use banksync_core::sync::SyncService;

/// Default batch sync cadence in seconds.
pub const SYNC_INTERVAL_SECS: u64 = 60 * 60 * 24;

/// Maximum jitter (seconds) added to each cycle so replicas do not hit the
/// provider in lockstep.
pub const SYNC_INTERVAL_JITTER_SECS: u64 = 300;

fn cycle_jitter() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    nanos % (SYNC_INTERVAL_JITTER_SECS + 1)
}

/// Spawn the periodic sync loop. Runs until the process exits.
pub fn spawn_sync_scheduler(sync: Arc<SyncService>, interval_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = interval_secs + cycle_jitter();
            info!(wait_secs = wait, "Next scheduled sync");
            tokio::time::sleep(Duration::from_secs(wait)).await;

            let summary = sync.run_sync().await;
            info!(
                synced = summary.synced,
                skipped = summary.skipped,
                failed = summary.failed,
                "Scheduled sync run finished"
            );
        }
    })
}
