//! Cron-equivalent sync trigger.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTriggerResponse {
    pub status: String,
}

/// Kick off a batch sync run. Fire-and-forget: the external scheduler
/// observes nothing beyond acceptance.
pub async fn trigger_sync(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<SyncTriggerResponse>)> {
    let sync = Arc::clone(&state.sync);
    tokio::spawn(async move {
        let summary = sync.run_sync().await;
        info!(
            synced = summary.synced,
            skipped = summary.skipped,
            failed = summary.failed,
            "Triggered sync run finished"
        );
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(SyncTriggerResponse {
            status: "accepted".to_string(),
        }),
    ))
}
