//! Row mapping between the transaction_ledgers table and the domain model.

use diesel::prelude::*;

use banksync_core::errors::Result;
use banksync_core::ledger::{ProviderTransaction, TransactionLedger};

use crate::accounts::model::parse_timestamp;

#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::transaction_ledgers)]
pub struct TransactionLedgerDB {
    pub external_account_id: String,
    pub transactions: String,
    pub total_transactions: i64,
    pub last_sync: String,
}

pub(crate) fn to_domain(row: TransactionLedgerDB) -> Result<TransactionLedger> {
    let transactions: Vec<ProviderTransaction> = serde_json::from_str(&row.transactions)?;
    let last_sync = parse_timestamp(&row.last_sync)?;
    Ok(TransactionLedger {
        external_account_id: row.external_account_id,
        transactions,
        total_transactions: row.total_transactions,
        last_sync,
    })
}

pub(crate) fn from_domain(ledger: &TransactionLedger) -> Result<TransactionLedgerDB> {
    Ok(TransactionLedgerDB {
        external_account_id: ledger.external_account_id.clone(),
        transactions: serde_json::to_string(&ledger.transactions)?,
        // The stored count always mirrors the serialized set.
        total_transactions: ledger.transactions.len() as i64,
        last_sync: ledger.last_sync.to_rfc3339(),
    })
}
