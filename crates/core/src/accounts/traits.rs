//! Traits defining the contract for linked-account persistence.

use async_trait::async_trait;

use super::model::{AccountStatus, ItemReconciliation, LinkedAccount, NewLinkedAccount};
use crate::errors::Result;

/// Repository contract for the linked-account store.
///
/// All status mutation goes through [`mark_item_ready`] and
/// [`deactivate`]; no caller writes the status column directly.
///
/// [`mark_item_ready`]: LinkedAccountRepositoryTrait::mark_item_ready
/// [`deactivate`]: LinkedAccountRepositoryTrait::deactivate
#[async_trait]
pub trait LinkedAccountRepositoryTrait: Send + Sync {
    fn get_by_id(&self, account_id: &str) -> Result<Option<LinkedAccount>>;

    fn get_by_external_ids(
        &self,
        external_item_id: &str,
        external_account_id: &str,
    ) -> Result<Option<LinkedAccount>>;

    fn list_by_business(&self, business_id: &str) -> Result<Vec<LinkedAccount>>;

    fn list_by_status(&self, status: AccountStatus) -> Result<Vec<LinkedAccount>>;

    async fn insert(&self, new_account: NewLinkedAccount) -> Result<LinkedAccount>;

    /// Soft-delete: terminal `Inactive` state, reachable from any state.
    async fn deactivate(&self, account_id: String) -> Result<usize>;

    /// Item-level readiness reconciliation: count-then-update-with-retry
    /// inside one atomic transaction. On success every row sharing the item
    /// id is `Ready`; on failure nothing is persisted and the error carries
    /// the last observed expected/affected pair.
    async fn mark_item_ready(
        &self,
        external_item_id: String,
        retry_budget: u32,
    ) -> Result<ItemReconciliation>;
}
