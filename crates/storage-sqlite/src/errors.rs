//! Storage-layer error type and its mapping into the core taxonomy.

use thiserror::Error;

use banksync_core::errors::{DatabaseError, Error};

/// Errors raised inside the SQLite storage crate.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database query failed: {0}")]
    Diesel(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Pool(e) => Error::Database(DatabaseError::Pool(e.to_string())),
            StorageError::Diesel(e) => Error::Database(DatabaseError::QueryFailed(e.to_string())),
            other => Error::Database(DatabaseError::Internal(other.to_string())),
        }
    }
}
