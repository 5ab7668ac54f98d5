//! Row mapping between the linked_accounts table and the domain model.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use banksync_core::accounts::{
    AccountStatus, BankAccountInfo, CredentialHandle, LinkedAccount, NewLinkedAccount,
};
use banksync_core::errors::{DatabaseError, Error, Result};

pub(crate) fn enum_to_db<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.trim_matches('"').to_string())
}

pub(crate) fn enum_from_db<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    Ok(serde_json::from_str(&format!("\"{}\"", value))?)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "Unparseable stored timestamp '{value}': {e}"
            )))
        })
}

#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::linked_accounts)]
pub struct LinkedAccountDB {
    pub id: String,
    pub business_id: String,
    pub external_item_id: String,
    pub external_account_id: String,
    pub institution_id: String,
    pub credential_handle: String,
    pub account_info: String,
    pub linked_at: String,
    pub linked_by_role: String,
    pub linked_by_id: String,
    pub share_with_tenant: bool,
    pub share_with_customer: bool,
    pub status: String,
}

pub(crate) fn to_domain(row: LinkedAccountDB) -> Result<LinkedAccount> {
    let account_info: BankAccountInfo = serde_json::from_str(&row.account_info)?;
    Ok(LinkedAccount {
        id: row.id,
        business_id: row.business_id,
        external_item_id: row.external_item_id,
        external_account_id: row.external_account_id,
        institution_id: row.institution_id,
        credential_handle: CredentialHandle::new(row.credential_handle),
        account_info,
        linked_at: parse_timestamp(&row.linked_at)?,
        linked_by_role: enum_from_db(&row.linked_by_role)?,
        linked_by_id: row.linked_by_id,
        share_with_tenant: row.share_with_tenant,
        share_with_customer: row.share_with_customer,
        status: enum_from_db(&row.status)?,
    })
}

pub(crate) fn from_new(
    new_account: NewLinkedAccount,
    id: String,
    linked_at: DateTime<Utc>,
) -> Result<LinkedAccountDB> {
    Ok(LinkedAccountDB {
        id,
        business_id: new_account.business_id,
        external_item_id: new_account.external_item_id,
        external_account_id: new_account.external_account_id,
        institution_id: new_account.institution_id,
        credential_handle: new_account.credential_handle.expose().to_string(),
        account_info: serde_json::to_string(&new_account.account_info)?,
        linked_at: linked_at.to_rfc3339(),
        linked_by_role: enum_to_db(&new_account.linked_by_role)?,
        linked_by_id: new_account.linked_by_id,
        share_with_tenant: new_account.share_with_tenant,
        share_with_customer: new_account.share_with_customer,
        status: enum_to_db(&AccountStatus::Pending)?,
    })
}
