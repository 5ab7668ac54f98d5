//! SQLite storage for per-account transaction ledgers.

mod model;
mod repository;

pub use model::TransactionLedgerDB;
pub use repository::TransactionLedgerRepository;
