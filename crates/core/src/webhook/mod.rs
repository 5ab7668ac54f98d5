//! Provider webhook payloads and classification.
//!
//! Classification is pure so the ingress decision is testable without HTTP:
//! the server layer maps [`WebhookDisposition`] onto responses and defers
//! reconciliation work behind the settle delay.

use serde::{Deserialize, Serialize};

/// Webhook type announcing transaction lifecycle events.
pub const TRANSACTIONS_WEBHOOK_TYPE: &str = "TRANSACTIONS";

/// Webhook code signalling the historical backfill finished for an item.
pub const HISTORICAL_UPDATE_CODE: &str = "HISTORICAL_UPDATE";

/// Provider-side error carried inside a webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderWebhookError {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Inbound provider notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderWebhook {
    pub item_id: String,
    pub webhook_type: String,
    pub webhook_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderWebhookError>,
}

/// What the ingress should do with a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookDisposition {
    /// Historical backfill complete: settle, then reconcile the item ready.
    ReconcileItem,
    /// Recognized-or-unknown event with nothing to do; acknowledge only.
    Acknowledge,
    /// Terminal provider-side failure; log, never retried here.
    ProviderError,
}

/// Decide how to handle `webhook`. Unknown types and codes are acknowledged
/// without action so new provider events never break the ingress.
pub fn classify_webhook(webhook: &ProviderWebhook) -> WebhookDisposition {
    if webhook.error.is_some() {
        return WebhookDisposition::ProviderError;
    }
    if webhook.webhook_type == TRANSACTIONS_WEBHOOK_TYPE
        && webhook.webhook_code == HISTORICAL_UPDATE_CODE
    {
        return WebhookDisposition::ReconcileItem;
    }
    WebhookDisposition::Acknowledge
}
