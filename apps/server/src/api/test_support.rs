//! Shared fixtures for API handler tests: a real SQLite store under a temp
//! directory, an empty provider stub, and a oneshot request helper.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

use banksync_core::accounts::{
    AccountLinkService, AccountStatus, BankAccountInfo, CredentialHandle,
    LinkedAccountRepositoryTrait, LinkerRole, NewLinkedAccount,
};
use banksync_core::provider::{ProviderTransactionsClient, TransactionsPage};
use banksync_core::sync::{SyncConfig, SyncService};
use banksync_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, LinkedAccountRepository,
    TransactionLedgerRepository,
};

use crate::state::AppState;

/// Provider stub whose every window is empty.
struct EmptyProvider;

#[async_trait]
impl ProviderTransactionsClient for EmptyProvider {
    async fn fetch_transactions(
        &self,
        _account_id: &str,
        _access_token: &CredentialHandle,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
        _offset: usize,
        _count: usize,
    ) -> banksync_core::Result<TransactionsPage> {
        Ok(TransactionsPage {
            transactions: Vec::new(),
            total_for_window: 0,
        })
    }
}

/// Direct handle on the account store for seeding and assertions.
pub(crate) struct RepoHandle {
    accounts: Arc<LinkedAccountRepository>,
}

impl RepoHandle {
    pub(crate) async fn link(&self, item: &str, account: &str) {
        self.accounts
            .insert(new_linked(item, account))
            .await
            .expect("seed linked account");
    }

    pub(crate) fn count_by_status(&self, status: AccountStatus) -> usize {
        self.accounts
            .list_by_status(status)
            .expect("list by status")
            .len()
    }
}

fn new_linked(item: &str, account: &str) -> NewLinkedAccount {
    NewLinkedAccount {
        business_id: "biz-1".to_string(),
        external_item_id: item.to_string(),
        external_account_id: account.to_string(),
        institution_id: "ins_1".to_string(),
        credential_handle: CredentialHandle::new("access-sandbox-token"),
        account_info: BankAccountInfo {
            name: "Business Checking".to_string(),
            official_name: None,
            account_type: "depository".to_string(),
            account_subtype: Some("checking".to_string()),
            mask: Some("0000".to_string()),
        },
        linked_by_role: LinkerRole::Owner,
        linked_by_id: "user-1".to_string(),
        share_with_tenant: false,
        share_with_customer: false,
    }
}

pub(crate) async fn test_state_with_settle(settle_secs: u64) -> (AppState, RepoHandle) {
    let data_dir = tempdir()
        .expect("tempdir")
        .keep()
        .to_string_lossy()
        .to_string();
    let db_path = init(&data_dir).expect("init db");
    run_migrations(&db_path).expect("migrate db");
    let pool = create_pool(&db_path).expect("create pool");
    let writer = spawn_writer(pool.as_ref().clone());

    let accounts = Arc::new(LinkedAccountRepository::new(
        Arc::clone(&pool),
        writer.clone(),
    ));
    let ledgers = Arc::new(TransactionLedgerRepository::new(pool, writer));

    let config = SyncConfig {
        webhook_settle_delay_secs: settle_secs,
        ..SyncConfig::default()
    };
    let sync = Arc::new(SyncService::new(
        Arc::clone(&accounts) as Arc<dyn LinkedAccountRepositoryTrait>,
        ledgers,
        Arc::new(EmptyProvider),
        config,
    ));
    let links = Arc::new(AccountLinkService::new(
        Arc::clone(&accounts) as Arc<dyn LinkedAccountRepositoryTrait>
    ));

    (
        AppState { sync, links },
        RepoHandle { accounts },
    )
}

pub(crate) async fn post_json(state: AppState, path: &str, body: Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    crate::api::router(state)
        .oneshot(request)
        .await
        .expect("response")
}

pub(crate) fn link_payload(item: &str, account: &str) -> Value {
    json!({
        "businessId": "biz-1",
        "externalItemId": item,
        "externalAccountId": account,
        "institutionId": "ins_1",
        "credentialHandle": "access-sandbox-token",
        "accountInfo": {
            "name": "Business Checking",
            "accountType": "depository",
            "accountSubtype": "checking",
            "mask": "0000"
        },
        "linkedByRole": "owner",
        "linkedById": "user-1",
        "shareWithTenant": false,
        "shareWithCustomer": false
    })
}
