//! Transaction ledger domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One provider transaction, typed at the adapter boundary.
///
/// `transaction_id` is the dedup key across repeated syncs. Unknown provider
/// fields are dropped during deserialization rather than carried as a loose
/// blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTransaction {
    pub transaction_id: String,
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

/// The persisted deduplicated transaction set for one external account.
///
/// Invariants: `total_transactions == transactions.len()` always, and
/// `last_sync` is monotonically non-decreasing. Created on the first
/// successful fetch; mutated only by the merge path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLedger {
    pub external_account_id: String,
    pub transactions: Vec<ProviderTransaction>,
    pub total_transactions: i64,
    pub last_sync: DateTime<Utc>,
}

impl TransactionLedger {
    /// Build a ledger, normalizing the count invariant from the set itself.
    pub fn new(
        external_account_id: impl Into<String>,
        transactions: Vec<ProviderTransaction>,
        last_sync: DateTime<Utc>,
    ) -> Self {
        let total_transactions = transactions.len() as i64;
        Self {
            external_account_id: external_account_id.into(),
            transactions,
            total_transactions,
            last_sync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(id: &str) -> ProviderTransaction {
        ProviderTransaction {
            transaction_id: id.to_string(),
            account_id: "acc-1".to_string(),
            amount: dec!(12.34),
            iso_currency_code: Some("USD".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date"),
            name: Some("COFFEE SHOP".to_string()),
            pending: false,
            category: vec!["Food and Drink".to_string()],
        }
    }

    #[test]
    fn ledger_count_follows_transaction_set() {
        let ledger = TransactionLedger::new("acc-1", vec![tx("t1"), tx("t2")], Utc::now());
        assert_eq!(ledger.total_transactions, 2);
    }

    #[test]
    fn transaction_wire_shape_is_camel_case() {
        let value = serde_json::to_value(tx("t1")).expect("serialize");
        assert!(value.get("transactionId").is_some());
        assert!(value.get("isoCurrencyCode").is_some());
    }
}
