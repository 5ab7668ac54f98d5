//! banksync server: webhook ingress plus the scheduled sync job.

mod api;
mod error;
mod scheduler;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use banksync_core::accounts::{AccountLinkService, LinkedAccountRepositoryTrait};
use banksync_core::ledger::TransactionLedgerRepositoryTrait;
use banksync_core::provider::ProviderTransactionsClient;
use banksync_core::sync::{SyncConfig, SyncService};
use banksync_provider::AggregationApiClient;
use banksync_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, LinkedAccountRepository,
    TransactionLedgerRepository,
};

use crate::state::AppState;

const DEFAULT_PROVIDER_API_URL: &str = "https://api.aggregator.example";

fn provider_api_url() -> String {
    std::env::var("PROVIDER_API_URL")
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_PROVIDER_API_URL.to_string())
}

fn data_dir() -> String {
    std::env::var("BANKSYNC_DATA_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "./data".to_string())
}

fn bind_address() -> String {
    std::env::var("BANKSYNC_BIND")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "127.0.0.1:8080".to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn sync_config_from_env() -> SyncConfig {
    let defaults = SyncConfig::default();
    SyncConfig {
        sync_debounce_days: env_u64("SYNC_DEBOUNCE_DAYS", defaults.sync_debounce_days as u64)
            as i64,
        webhook_settle_delay_secs: env_u64(
            "WEBHOOK_SETTLE_DELAY_SECS",
            defaults.webhook_settle_delay_secs,
        ),
        account_deadline_secs: env_u64("ACCOUNT_DEADLINE_SECS", defaults.account_deadline_secs),
        max_concurrent_accounts: env_u64(
            "MAX_CONCURRENT_ACCOUNTS",
            defaults.max_concurrent_accounts as u64,
        ) as usize,
        ..defaults
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = data_dir();
    let db_path = init(&data_dir).context("initialize data directory")?;
    run_migrations(&db_path).context("run database migrations")?;
    let pool = create_pool(&db_path).context("build connection pool")?;
    let writer = spawn_writer(pool.as_ref().clone());

    let accounts: Arc<dyn LinkedAccountRepositoryTrait> = Arc::new(LinkedAccountRepository::new(
        Arc::clone(&pool),
        writer.clone(),
    ));
    let ledgers: Arc<dyn TransactionLedgerRepositoryTrait> =
        Arc::new(TransactionLedgerRepository::new(pool, writer));
    let provider: Arc<dyn ProviderTransactionsClient> =
        Arc::new(AggregationApiClient::new(&provider_api_url()));

    let config = sync_config_from_env();
    let sync = Arc::new(SyncService::new(
        Arc::clone(&accounts),
        ledgers,
        provider,
        config,
    ));
    let links = Arc::new(AccountLinkService::new(accounts));

    let interval_secs = env_u64("SYNC_INTERVAL_SECS", scheduler::SYNC_INTERVAL_SECS);
    scheduler::spawn_sync_scheduler(Arc::clone(&sync), interval_secs);

    let app = api::router(AppState { sync, links });
    let bind = bind_address();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    info!(address = %bind, db = %db_path, "banksync server listening");

    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}
