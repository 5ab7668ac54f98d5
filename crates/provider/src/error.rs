//! Error types for the aggregation provider adapter.

use thiserror::Error;

/// Result type alias for provider adapter operations.
pub type Result<T> = std::result::Result<T, ProviderApiError>;

/// Retry policy class for API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRetryClass {
    Retryable,
    Permanent,
    ReauthRequired,
}

/// Errors that can occur while talking to the aggregation provider.
#[derive(Debug, Error)]
pub enum ProviderApiError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the provider API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Provider returned a payload that fails boundary validation
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication error (missing or invalid access token)
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl ProviderApiError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error for a malformed provider payload
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Classify error for retry policy.
    pub fn retry_class(&self) -> ApiRetryClass {
        match self {
            Self::Api { status, .. } => match *status {
                401 | 403 => ApiRetryClass::ReauthRequired,
                408 | 409 | 423 | 425 | 429 => ApiRetryClass::Retryable,
                500..=599 => ApiRetryClass::Retryable,
                _ => ApiRetryClass::Permanent,
            },
            Self::Http(_) => ApiRetryClass::Retryable,
            Self::Json(_) => ApiRetryClass::Permanent,
            Self::InvalidResponse(_) => ApiRetryClass::Permanent,
            Self::Auth(_) => ApiRetryClass::ReauthRequired,
        }
    }
}

impl From<ProviderApiError> for banksync_core::Error {
    fn from(err: ProviderApiError) -> Self {
        banksync_core::Error::Provider(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        assert_eq!(
            ProviderApiError::api(503, "maintenance").retry_class(),
            ApiRetryClass::Retryable
        );
    }

    #[test]
    fn auth_failures_require_relink() {
        assert_eq!(
            ProviderApiError::api(401, "invalid access token").retry_class(),
            ApiRetryClass::ReauthRequired
        );
    }

    #[test]
    fn malformed_payloads_are_permanent() {
        assert_eq!(
            ProviderApiError::invalid_response("transactionId missing").retry_class(),
            ApiRetryClass::Permanent
        );
    }
}
