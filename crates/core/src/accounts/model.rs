//! Linked-account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a linked account.
///
/// `Pending` accounts are freshly linked and the provider is still
/// backfilling history. The `Pending -> Ready` transition happens only
/// through the item-level reconciliation protocol, never by direct field
/// write. `Inactive` is the terminal soft-delete state, reachable from any
/// state via explicit deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Ready,
    Inactive,
}

/// Who initiated the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkerRole {
    Owner,
    Tenant,
    Customer,
}

/// Opaque provider access token for one linked item.
///
/// The wrapped value must never reach logs; `Debug` and `Display` render a
/// redacted form and callers go through [`CredentialHandle::expose`] at the
/// provider boundary only.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHandle(String);

impl CredentialHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the provider adapter only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked rendering safe for logs: first four characters plus length.
    pub fn masked(&self) -> String {
        let prefix = self.0.chars().take(4).collect::<String>();
        format!("{}…({})", prefix, self.0.len())
    }
}

impl fmt::Debug for CredentialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialHandle({})", self.masked())
    }
}

/// Normalized bank-account metadata captured at link time.
///
/// Validated at the provider-adapter boundary; persisted as a JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountInfo {
    pub name: String,
    #[serde(default)]
    pub official_name: Option<String>,
    pub account_type: String,
    #[serde(default)]
    pub account_subtype: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
}

/// One linked external bank account owned by a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub id: String,
    pub business_id: String,
    pub external_item_id: String,
    pub external_account_id: String,
    pub institution_id: String,
    #[serde(skip_serializing)]
    pub credential_handle: CredentialHandle,
    pub account_info: BankAccountInfo,
    pub linked_at: DateTime<Utc>,
    pub linked_by_role: LinkerRole,
    pub linked_by_id: String,
    pub share_with_tenant: bool,
    pub share_with_customer: bool,
    pub status: AccountStatus,
}

/// Payload for linking a new account. The storage layer assigns the id and
/// the link service stamps `linked_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLinkedAccount {
    pub business_id: String,
    pub external_item_id: String,
    pub external_account_id: String,
    pub institution_id: String,
    #[serde(skip_serializing)]
    pub credential_handle: CredentialHandle,
    pub account_info: BankAccountInfo,
    pub linked_by_role: LinkerRole,
    pub linked_by_id: String,
    pub share_with_tenant: bool,
    pub share_with_customer: bool,
}

/// Outcome of one item-level status reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReconciliation {
    pub external_item_id: String,
    pub expected: i64,
    pub affected: i64,
    pub attempts: u32,
}
