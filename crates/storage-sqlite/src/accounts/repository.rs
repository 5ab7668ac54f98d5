//! Repository for the linked-account store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::warn;
use uuid::Uuid;

use banksync_core::accounts::{
    AccountStatus, ItemReconciliation, LinkedAccount, LinkedAccountRepositoryTrait,
    NewLinkedAccount,
};
use banksync_core::errors::{Error, Result};

use super::model::{enum_to_db, from_new, to_domain, LinkedAccountDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::linked_accounts;

pub struct LinkedAccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LinkedAccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Count-then-update-with-retry loop of the reconciliation protocol.
///
/// `expected` is the contract target for the whole attempt sequence; it is
/// deliberately not re-read between attempts. Exhausting the budget returns
/// the mismatch error, which makes the surrounding transaction roll back so
/// no partial status change is ever persisted.
fn reconcile_with_retry<F>(
    external_item_id: &str,
    expected: i64,
    retry_budget: u32,
    mut apply: F,
) -> Result<ItemReconciliation>
where
    F: FnMut() -> Result<i64>,
{
    let budget = retry_budget.max(1);
    let mut affected = 0i64;

    for attempt in 1..=budget {
        affected = apply()?;
        if affected == expected {
            return Ok(ItemReconciliation {
                external_item_id: external_item_id.to_string(),
                expected,
                affected,
                attempts: attempt,
            });
        }
        warn!(
            "Reconciliation attempt {attempt}/{budget} for item {external_item_id}: \
             affected {affected} != expected {expected}"
        );
    }

    Err(Error::Reconciliation {
        external_item_id: external_item_id.to_string(),
        expected,
        affected,
        attempts: budget,
    })
}

#[async_trait]
impl LinkedAccountRepositoryTrait for LinkedAccountRepository {
    fn get_by_id(&self, account_id: &str) -> Result<Option<LinkedAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let row = linked_accounts::table
            .find(account_id)
            .first::<LinkedAccountDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(to_domain).transpose()
    }

    fn get_by_external_ids(
        &self,
        external_item_id: &str,
        external_account_id: &str,
    ) -> Result<Option<LinkedAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let row = linked_accounts::table
            .filter(linked_accounts::external_item_id.eq(external_item_id))
            .filter(linked_accounts::external_account_id.eq(external_account_id))
            .first::<LinkedAccountDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(to_domain).transpose()
    }

    fn list_by_business(&self, business_id: &str) -> Result<Vec<LinkedAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = linked_accounts::table
            .filter(linked_accounts::business_id.eq(business_id))
            .order(linked_accounts::linked_at.asc())
            .load::<LinkedAccountDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_domain).collect()
    }

    fn list_by_status(&self, status_filter: AccountStatus) -> Result<Vec<LinkedAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = linked_accounts::table
            .filter(linked_accounts::status.eq(enum_to_db(&status_filter)?))
            .order(linked_accounts::linked_at.asc())
            .load::<LinkedAccountDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn insert(&self, new_account: NewLinkedAccount) -> Result<LinkedAccount> {
        self.writer
            .exec(move |conn| {
                let row = from_new(new_account, Uuid::new_v4().to_string(), Utc::now())?;
                let inserted = diesel::insert_into(linked_accounts::table)
                    .values(&row)
                    .returning(LinkedAccountDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                to_domain(inserted)
            })
            .await
    }

    async fn deactivate(&self, account_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(linked_accounts::table.find(account_id))
                    .set(linked_accounts::status.eq(enum_to_db(&AccountStatus::Inactive)?))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }

    async fn mark_item_ready(
        &self,
        external_item_id: String,
        retry_budget: u32,
    ) -> Result<ItemReconciliation> {
        self.writer
            .exec(move |conn| {
                let expected: i64 = linked_accounts::table
                    .filter(linked_accounts::external_item_id.eq(&external_item_id))
                    .count()
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                let ready = enum_to_db(&AccountStatus::Ready)?;
                reconcile_with_retry(&external_item_id, expected, retry_budget, || {
                    let affected = diesel::update(
                        linked_accounts::table
                            .filter(linked_accounts::external_item_id.eq(&external_item_id)),
                    )
                    .set(linked_accounts::status.eq(&ready))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                    Ok(affected as i64)
                })
            })
            .await
    }
}
