//! Traits defining the contract for the transaction ledger store.

use async_trait::async_trait;

use super::model::TransactionLedger;
use crate::errors::Result;

/// Repository contract for the per-account transaction ledger.
///
/// Ledger rows are created on the first successful fetch and mutated only by
/// the merge path; deletion happens only through explicit account removal.
#[async_trait]
pub trait TransactionLedgerRepositoryTrait: Send + Sync {
    fn get(&self, external_account_id: &str) -> Result<Option<TransactionLedger>>;

    /// Insert-or-replace the ledger row. `last_sync` never regresses: when
    /// the stored row carries a later timestamp the stored value is kept.
    async fn upsert(&self, ledger: TransactionLedger) -> Result<TransactionLedger>;
}
