//! Error types shared across the linking and sync engine.

use thiserror::Error;

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Persistence-layer failures, produced by the storage crates.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Top-level error taxonomy.
///
/// `Provider` failures are transient and retried at the next scheduled run,
/// never mid-batch. `Database` failures abort the current account's pipeline
/// only. `Reconciliation` is the exhausted-retry terminal failure of the
/// status update protocol, surfaced for manual intervention.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Status reconciliation mismatch for item {external_item_id}: expected {expected} rows, update affected {affected} after {attempts} attempts")]
    Reconciliation {
        external_item_id: String,
        expected: i64,
        affected: i64,
        attempts: u32,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Deadline exceeded: {0}")]
    Deadline(String),
}

impl Error {
    /// Create a provider error from any displayable source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when the failure is worth retrying on a later scheduled run.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Deadline(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_are_transient() {
        assert!(Error::provider("socket closed").is_transient());
        assert!(!Error::validation("bad payload").is_transient());
    }

    #[test]
    fn reconciliation_error_carries_diagnostics() {
        let err = Error::Reconciliation {
            external_item_id: "item-1".to_string(),
            expected: 2,
            affected: 1,
            attempts: 3,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("expected 2"));
        assert!(rendered.contains("affected 1"));
        assert!(rendered.contains("3 attempts"));
    }
}
