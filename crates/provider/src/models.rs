//! Wire types for the aggregation provider API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use banksync_core::ledger::ProviderTransaction;

use crate::error::ProviderApiError;

/// Body of `POST /transactions/get`. The access token travels in the
/// Authorization header, never in the body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsGetRequest {
    pub account_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub offset: usize,
    pub count: usize,
}

/// One transaction as the provider ships it. Optional fields default;
/// unknown fields are dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTransaction {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub account_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub category: Vec<String>,
}

/// Provider response for one page of a window.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsGetResponse {
    #[serde(default)]
    pub transactions: Vec<WireTransaction>,
    pub total_for_window: usize,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Structured API error body.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
}

/// Validate a wire transaction and lift it into the domain type.
///
/// Required fields are enforced here so nothing downstream ever sees a
/// half-formed transaction.
pub fn into_domain_transaction(
    wire: WireTransaction,
) -> Result<ProviderTransaction, ProviderApiError> {
    if wire.transaction_id.trim().is_empty() {
        return Err(ProviderApiError::invalid_response(
            "transaction is missing transactionId",
        ));
    }
    if wire.account_id.trim().is_empty() {
        return Err(ProviderApiError::invalid_response(format!(
            "transaction {} is missing accountId",
            wire.transaction_id
        )));
    }

    Ok(ProviderTransaction {
        transaction_id: wire.transaction_id,
        account_id: wire.account_id,
        amount: wire.amount,
        iso_currency_code: wire.iso_currency_code,
        date: wire.date,
        name: wire.name,
        pending: wire.pending,
        category: wire.category,
    })
}
