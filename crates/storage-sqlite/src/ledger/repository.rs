//! Repository for the transaction ledger store.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use banksync_core::errors::Result;
use banksync_core::ledger::{TransactionLedger, TransactionLedgerRepositoryTrait};

use super::model::{from_domain, to_domain, TransactionLedgerDB};
use crate::accounts::model::parse_timestamp;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::transaction_ledgers;

pub struct TransactionLedgerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionLedgerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionLedgerRepositoryTrait for TransactionLedgerRepository {
    fn get(&self, external_account_id: &str) -> Result<Option<TransactionLedger>> {
        let mut conn = get_connection(&self.pool)?;
        let row = transaction_ledgers::table
            .find(external_account_id)
            .first::<TransactionLedgerDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(to_domain).transpose()
    }

    async fn upsert(&self, ledger: TransactionLedger) -> Result<TransactionLedger> {
        self.writer
            .exec(move |conn| {
                let mut row = from_domain(&ledger)?;

                // last_sync never regresses: a delayed writer must not roll
                // an already-advanced ledger back in time.
                let stored_last_sync = transaction_ledgers::table
                    .find(&row.external_account_id)
                    .select(transaction_ledgers::last_sync)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                if let Some(stored) = stored_last_sync {
                    if parse_timestamp(&stored)? > ledger.last_sync {
                        row.last_sync = stored;
                    }
                }

                let persisted = diesel::insert_into(transaction_ledgers::table)
                    .values(&row)
                    .on_conflict(transaction_ledgers::external_account_id)
                    .do_update()
                    .set(&row)
                    .returning(TransactionLedgerDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                to_domain(persisted)
            })
            .await
    }
}
