//! Webhook ingress for provider notifications.
//!
//! The provider is acknowledged immediately; reconciliation work runs in a
//! background task after the settle delay so provider-side indexing can
//! finish before the status query is trusted.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use banksync_core::webhook::{classify_webhook, ProviderWebhook, WebhookDisposition};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub status: String,
}

fn ack(status: &str) -> Json<WebhookAck> {
    Json(WebhookAck {
        status: status.to_string(),
    })
}

pub async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<ProviderWebhook>,
) -> ApiResult<(StatusCode, Json<WebhookAck>)> {
    match classify_webhook(&payload) {
        WebhookDisposition::ProviderError => {
            // Terminal provider-side failure: logged, never retried here.
            let detail = payload
                .error
                .as_ref()
                .and_then(|e| e.error_code.clone())
                .unwrap_or_else(|| "unknown".to_string());
            error!(
                item_id = %payload.item_id,
                error_code = %detail,
                "Provider reported a webhook-level error"
            );
            Err(ApiError::BadRequest(format!(
                "provider error for item {}: {}",
                payload.item_id, detail
            )))
        }
        WebhookDisposition::Acknowledge => {
            info!(
                item_id = %payload.item_id,
                webhook_type = %payload.webhook_type,
                webhook_code = %payload.webhook_code,
                "Acknowledged webhook without action"
            );
            Ok((StatusCode::OK, ack("ignored")))
        }
        WebhookDisposition::ReconcileItem => {
            let sync = Arc::clone(&state.sync);
            let settle = Duration::from_secs(sync.config().webhook_settle_delay_secs);
            let item_id = payload.item_id.clone();
            info!(item_id = %item_id, settle_secs = settle.as_secs(), "Scheduling item reconciliation");

            tokio::spawn(async move {
                tokio::time::sleep(settle).await;
                match sync.reconcile_item(&item_id).await {
                    Ok(reconciliation) => {
                        info!(
                            item_id = %item_id,
                            affected = reconciliation.affected,
                            attempts = reconciliation.attempts,
                            "Item reconciled ready"
                        );
                    }
                    Err(err) => {
                        error!(item_id = %item_id, "Item reconciliation failed: {err}");
                    }
                }
            });

            Ok((StatusCode::OK, ack("reconciliation scheduled")))
        }
    }
}
