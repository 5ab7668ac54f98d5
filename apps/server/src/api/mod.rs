//! HTTP surface: webhook ingress, sync trigger, account linking.

mod accounts;
mod sync;
mod webhook;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/webhook", post(webhook::receive_webhook))
        .route("/sync/run", post(sync::trigger_sync))
        .route("/accounts/link", post(accounts::link_account))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support;
