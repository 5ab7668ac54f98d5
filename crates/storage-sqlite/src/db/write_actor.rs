//! Single-writer actor for SQLite mutations.
//!
//! SQLite allows one writer at a time; funneling every mutation through one
//! dedicated thread avoids lock contention between async tasks. Each job
//! runs inside an immediate transaction, so a job that returns an error
//! leaves no partial write behind.

use std::thread;

use diesel::sqlite::SqliteConnection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use banksync_core::errors::{DatabaseError, Error, Result};

use super::DbPool;
use crate::errors::StorageError;

type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

/// Transaction error carrier: either the job's own domain error or a diesel
/// failure from commit/rollback handling.
enum WriteTxError {
    Domain(Error),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for WriteTxError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Diesel(err)
    }
}

/// Cloneable handle submitting jobs to the writer thread.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::UnboundedSender<WriteJob>,
}

impl WriteHandle {
    /// Run `job` on the writer thread inside an immediate transaction and
    /// await its result. An `Err` from the job rolls the transaction back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel::<Result<T>>();

        let wrapped: WriteJob = Box::new(move |conn| {
            let outcome = conn
                .immediate_transaction::<T, WriteTxError, _>(|tx| {
                    job(tx).map_err(WriteTxError::Domain)
                })
                .map_err(|err| match err {
                    WriteTxError::Domain(domain) => domain,
                    WriteTxError::Diesel(diesel_err) => StorageError::from(diesel_err).into(),
                });
            let _ = reply_tx.send(outcome);
        });

        self.tx.send(wrapped).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Write actor has shut down".to_string(),
            ))
        })?;

        reply_rx.await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Write actor dropped the reply".to_string(),
            ))
        })?
    }
}

/// Start the writer thread. Jobs are executed strictly in submission order.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<WriteJob>();

    thread::spawn(move || {
        while let Some(job) = rx.blocking_recv() {
            match pool.get() {
                Ok(mut conn) => job(&mut conn),
                Err(err) => {
                    // Dropping the job closes its reply channel; the caller
                    // sees the actor error.
                    error!("Writer could not check out a connection: {err}");
                }
            }
        }
    });

    WriteHandle { tx }
}
