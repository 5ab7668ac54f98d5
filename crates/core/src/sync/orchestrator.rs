//! Sync orchestrator: iterates accounts eligible for sync and drives the
//! fetch/merge pipeline for each, isolating per-account failures.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};

use super::config::SyncConfig;
use super::locks::ItemLocks;
use super::windows::{incremental_window, initial_window, SyncMode, SyncWindow};
use crate::accounts::{
    AccountStatus, ItemReconciliation, LinkedAccount, LinkedAccountRepositoryTrait,
};
use crate::errors::{Error, Result};
use crate::ledger::{
    merge_transactions, TransactionLedger, TransactionLedgerRepositoryTrait,
};
use crate::provider::{fetch_window, ProviderTransactionsClient};

/// What happened to one account during a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSyncOutcome {
    /// Fetch + merge completed and the ledger row was persisted.
    Synced {
        mode: SyncMode,
        fetched: usize,
        added: usize,
        total_transactions: i64,
    },
    /// Incremental sync suppressed by the debounce; no provider call made.
    Debounced,
    /// The window fetched cleanly but contained nothing; ledger untouched.
    NothingFetched,
}

/// Batch-level tally returned by [`SyncService::run_sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncRunSummary {
    pub attempted: usize,
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Scheduled entry point for transaction synchronization, and the shared
/// path into the status reconciliation protocol.
pub struct SyncService {
    accounts: Arc<dyn LinkedAccountRepositoryTrait>,
    ledgers: Arc<dyn TransactionLedgerRepositoryTrait>,
    provider: Arc<dyn ProviderTransactionsClient>,
    locks: Arc<ItemLocks>,
    config: SyncConfig,
}

impl SyncService {
    pub fn new(
        accounts: Arc<dyn LinkedAccountRepositoryTrait>,
        ledgers: Arc<dyn TransactionLedgerRepositoryTrait>,
        provider: Arc<dyn ProviderTransactionsClient>,
        config: SyncConfig,
    ) -> Self {
        Self {
            accounts,
            ledgers,
            provider,
            locks: Arc::new(ItemLocks::new()),
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Sync every `Ready` account. One account's failure never aborts the
    /// batch; failures are logged and tallied. Accounts are independent and
    /// run with bounded parallelism, each under its own deadline.
    pub async fn run_sync(&self) -> SyncRunSummary {
        let eligible = match self.accounts.list_by_status(AccountStatus::Ready) {
            Ok(accounts) => accounts,
            Err(err) => {
                error!("Sync run aborted, could not load eligible accounts: {err}");
                return SyncRunSummary::default();
            }
        };

        info!("Sync run starting for {} account(s)", eligible.len());
        let deadline = Duration::from_secs(self.config.account_deadline_secs);

        let outcomes = stream::iter(eligible)
            .map(|account| async move {
                let result = match tokio::time::timeout(deadline, self.sync_account(&account))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(Error::Deadline(format!(
                        "account {} exceeded the {}s sync deadline",
                        account.external_account_id, self.config.account_deadline_secs
                    ))),
                };
                (account, result)
            })
            .buffer_unordered(self.config.max_concurrent_accounts.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut summary = SyncRunSummary::default();
        for (account, result) in outcomes {
            summary.attempted += 1;
            match result {
                Ok(AccountSyncOutcome::Synced {
                    mode,
                    fetched,
                    added,
                    total_transactions,
                }) => {
                    summary.synced += 1;
                    info!(
                        "Synced account {} ({:?}): fetched {}, added {}, ledger total {}",
                        account.external_account_id, mode, fetched, added, total_transactions
                    );
                }
                Ok(AccountSyncOutcome::Debounced) | Ok(AccountSyncOutcome::NothingFetched) => {
                    summary.skipped += 1;
                    debug!("Skipped account {}", account.external_account_id);
                }
                Err(err) => {
                    summary.failed += 1;
                    error!(
                        "Sync failed for account {} (item {}): {err}",
                        account.external_account_id, account.external_item_id
                    );
                }
            }
        }

        info!(
            "Sync run finished: {} synced, {} skipped, {} failed of {}",
            summary.synced, summary.skipped, summary.failed, summary.attempted
        );
        summary
    }

    /// Run the fetch/merge pipeline for a single account under its item
    /// lock.
    pub async fn sync_account(&self, account: &LinkedAccount) -> Result<AccountSyncOutcome> {
        let _item_guard = self.locks.lock(&account.external_item_id).await;

        let existing = self.ledgers.get(&account.external_account_id)?;
        let (mode, window) = match &existing {
            None => (
                SyncMode::Initial,
                initial_window(account.linked_at, self.config.initial_history_days),
            ),
            Some(ledger) => {
                match incremental_window(
                    ledger.last_sync,
                    Utc::now(),
                    self.config.sync_debounce_days,
                ) {
                    None => return Ok(AccountSyncOutcome::Debounced),
                    Some(window) => (SyncMode::Incremental, window),
                }
            }
        };

        let fetched = self.fetch_complete_window(account, &window).await?;
        if fetched.is_empty() {
            return Ok(AccountSyncOutcome::NothingFetched);
        }

        let fetched_count = fetched.len();
        let stored = existing.map(|ledger| ledger.transactions).unwrap_or_default();
        let merge = merge_transactions(&stored, fetched);
        // last_sync is the merge completion time, not the window end, so
        // provider eventual-consistency lag is re-covered on the next run.
        let ledger = TransactionLedger::new(
            account.external_account_id.clone(),
            merge.transactions,
            Utc::now(),
        );
        let persisted = self.ledgers.upsert(ledger).await?;

        Ok(AccountSyncOutcome::Synced {
            mode,
            fetched: fetched_count,
            added: merge.added,
            total_transactions: persisted.total_transactions,
        })
    }

    async fn fetch_complete_window(
        &self,
        account: &LinkedAccount,
        window: &SyncWindow,
    ) -> Result<Vec<crate::ledger::ProviderTransaction>> {
        match fetch_window(
            self.provider.as_ref(),
            account,
            window,
            self.config.page_size,
        )
        .await
        {
            Ok(transactions) => Ok(transactions),
            Err(err) => {
                // Partial windows are discarded; fetch is idempotent so the
                // next run re-covers the same window from last_sync.
                warn!(
                    "Discarding partial fetch for account {}: {} of reported window after {} page(s)",
                    account.external_account_id,
                    err.partial.len(),
                    err.pages_fetched
                );
                Err(err.source)
            }
        }
    }

    /// Advance every row of `external_item_id` to `Ready` through the
    /// count-then-update-with-retry protocol, serialized against any
    /// concurrent merge for the same item.
    pub async fn reconcile_item(&self, external_item_id: &str) -> Result<ItemReconciliation> {
        let _item_guard = self.locks.lock(external_item_id).await;
        let reconciliation = self
            .accounts
            .mark_item_ready(
                external_item_id.to_string(),
                self.config.reconcile_retry_budget,
            )
            .await?;
        info!(
            "Item {} reconciled ready: {} row(s) in {} attempt(s)",
            external_item_id, reconciliation.affected, reconciliation.attempts
        );
        Ok(reconciliation)
    }
}
