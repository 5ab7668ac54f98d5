//! SQLite persistence for linked accounts and transaction ledgers.

pub mod accounts;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod schema;

pub use accounts::LinkedAccountRepository;
pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbPool, WriteHandle};
pub use errors::StorageError;
pub use ledger::TransactionLedgerRepository;
