//! Aggregation-provider contract and the fetch-and-page engine.

mod fetch;

pub use fetch::*;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::accounts::CredentialHandle;
use crate::errors::Result;
use crate::ledger::ProviderTransaction;

/// One page of transactions plus the provider-reported total for the
/// requested window.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionsPage {
    pub transactions: Vec<ProviderTransaction>,
    pub total_for_window: usize,
}

/// Trait for fetching transactions from the aggregation provider.
///
/// The window is `[start_date, end_date)`; `offset`/`count` select one page.
#[async_trait]
pub trait ProviderTransactionsClient: Send + Sync {
    async fn fetch_transactions(
        &self,
        account_id: &str,
        access_token: &CredentialHandle,
        start_date: NaiveDate,
        end_date: NaiveDate,
        offset: usize,
        count: usize,
    ) -> Result<TransactionsPage>;
}
