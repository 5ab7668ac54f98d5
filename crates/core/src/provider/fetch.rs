//! Fetch-and-page engine: drives the provider client across pages until a
//! window is fully retrieved.

use log::debug;

use super::{ProviderTransactionsClient, TransactionsPage};
use crate::accounts::LinkedAccount;
use crate::errors::Error;
use crate::ledger::ProviderTransaction;
use crate::sync::SyncWindow;

/// A window fetch that aborted partway through.
///
/// Carries whatever pages were accumulated before the failure; callers must
/// not treat the partial set as a complete window.
#[derive(Debug)]
pub struct WindowFetchError {
    pub partial: Vec<ProviderTransaction>,
    pub pages_fetched: usize,
    pub source: Error,
}

impl std::fmt::Display for WindowFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "window fetch aborted after {} page(s) with {} transaction(s) accumulated: {}",
            self.pages_fetched,
            self.partial.len(),
            self.source
        )
    }
}

impl std::error::Error for WindowFetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Retrieve every transaction for `account` in `window`, paging through the
/// provider in fixed-size chunks.
///
/// An empty window short-circuits to an empty result without touching the
/// provider. Paging stops once the accumulated count reaches the
/// provider-reported total for the window, so a window with `total == 0`
/// costs a single probe request and `ceil(total / page_size)` requests
/// otherwise.
pub async fn fetch_window(
    client: &dyn ProviderTransactionsClient,
    account: &LinkedAccount,
    window: &SyncWindow,
    page_size: usize,
) -> Result<Vec<ProviderTransaction>, WindowFetchError> {
    if window.is_empty() {
        return Ok(Vec::new());
    }

    let start_date = window.start.date_naive();
    let end_date = window.end.date_naive();

    let mut accumulated: Vec<ProviderTransaction> = Vec::new();
    let mut offset = 0usize;
    let mut pages_fetched = 0usize;

    loop {
        let page: TransactionsPage = match client
            .fetch_transactions(
                &account.external_account_id,
                &account.credential_handle,
                start_date,
                end_date,
                offset,
                page_size,
            )
            .await
        {
            Ok(page) => page,
            Err(source) => {
                return Err(WindowFetchError {
                    partial: accumulated,
                    pages_fetched,
                    source,
                });
            }
        };

        pages_fetched += 1;
        let page_len = page.transactions.len();
        accumulated.extend(page.transactions);

        debug!(
            "Fetched page {} for account {}: {} transactions ({}/{} accumulated)",
            pages_fetched,
            account.external_account_id,
            page_len,
            accumulated.len(),
            page.total_for_window
        );

        if accumulated.len() >= page.total_for_window {
            return Ok(accumulated);
        }

        if page_len == 0 {
            // The provider claims more rows than it returns; bail rather
            // than loop on the same offset forever.
            return Err(WindowFetchError {
                partial: accumulated,
                pages_fetched,
                source: Error::provider(format!(
                    "short page at offset {}: provider reported {} total but returned none",
                    offset, page.total_for_window
                )),
            });
        }

        offset += page_size;
    }
}
