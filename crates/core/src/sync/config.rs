//! Sync engine tuning knobs with documented defaults.

/// Page size for provider transaction requests.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// How far back the initial fetch reaches from the link timestamp, in days.
pub const DEFAULT_INITIAL_HISTORY_DAYS: i64 = 730;

/// Minimum age of `last_sync` before an incremental sync runs, in days.
pub const DEFAULT_SYNC_DEBOUNCE_DAYS: i64 = 3;

/// Update attempts inside one reconciliation transaction.
pub const DEFAULT_RECONCILE_RETRY_BUDGET: u32 = 3;

/// Wait after a historical-update webhook before reconciling, in seconds.
/// Absorbs provider-side indexing lag.
pub const DEFAULT_WEBHOOK_SETTLE_DELAY_SECS: u64 = 30;

/// Deadline for one account's whole fetch/merge pipeline, in seconds.
pub const DEFAULT_ACCOUNT_DEADLINE_SECS: u64 = 300;

/// Upper bound on accounts synced concurrently in one batch run.
pub const DEFAULT_MAX_CONCURRENT_ACCOUNTS: usize = 4;

/// Injected configuration for the sync engine and reconciliation protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub page_size: usize,
    pub initial_history_days: i64,
    pub sync_debounce_days: i64,
    pub reconcile_retry_budget: u32,
    pub webhook_settle_delay_secs: u64,
    pub account_deadline_secs: u64,
    pub max_concurrent_accounts: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            initial_history_days: DEFAULT_INITIAL_HISTORY_DAYS,
            sync_debounce_days: DEFAULT_SYNC_DEBOUNCE_DAYS,
            reconcile_retry_budget: DEFAULT_RECONCILE_RETRY_BUDGET,
            webhook_settle_delay_secs: DEFAULT_WEBHOOK_SETTLE_DELAY_SECS,
            account_deadline_secs: DEFAULT_ACCOUNT_DEADLINE_SECS,
            max_concurrent_accounts: DEFAULT_MAX_CONCURRENT_ACCOUNTS,
        }
    }
}
