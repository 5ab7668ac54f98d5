//! Shared server state.

use std::sync::Arc;

use banksync_core::accounts::AccountLinkService;
use banksync_core::sync::SyncService;

#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<SyncService>,
    pub links: Arc<AccountLinkService>,
}
