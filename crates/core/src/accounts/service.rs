//! Account link service.

use std::sync::Arc;

use log::info;

use super::model::{LinkedAccount, NewLinkedAccount};
use super::traits::LinkedAccountRepositoryTrait;
use crate::errors::{Error, Result};

/// Persists new account links after boundary validation.
///
/// Accounts enter the store `Pending`; readiness is granted later by the
/// reconciliation protocol once the provider reports the historical backfill
/// complete.
pub struct AccountLinkService {
    accounts: Arc<dyn LinkedAccountRepositoryTrait>,
}

impl AccountLinkService {
    pub fn new(accounts: Arc<dyn LinkedAccountRepositoryTrait>) -> Self {
        Self { accounts }
    }

    pub async fn link_account(&self, new_account: NewLinkedAccount) -> Result<LinkedAccount> {
        validate_new_account(&new_account)?;

        if let Some(existing) = self.accounts.get_by_external_ids(
            &new_account.external_item_id,
            &new_account.external_account_id,
        )? {
            return Err(Error::validation(format!(
                "Account {}/{} is already linked (id {})",
                existing.external_item_id, existing.external_account_id, existing.id
            )));
        }

        let linked = self.accounts.insert(new_account).await?;
        info!(
            "Linked account {} for business {} (item {})",
            linked.id, linked.business_id, linked.external_item_id
        );
        Ok(linked)
    }
}

fn validate_new_account(new_account: &NewLinkedAccount) -> Result<()> {
    for (field, value) in [
        ("businessId", &new_account.business_id),
        ("externalItemId", &new_account.external_item_id),
        ("externalAccountId", &new_account.external_account_id),
        ("institutionId", &new_account.institution_id),
    ] {
        if value.trim().is_empty() {
            return Err(Error::validation(format!("{field} must not be empty")));
        }
    }
    if new_account.credential_handle.expose().is_empty() {
        return Err(Error::validation("credential handle must not be empty"));
    }
    Ok(())
}
