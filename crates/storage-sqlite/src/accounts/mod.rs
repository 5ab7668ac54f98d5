//! SQLite storage for linked accounts, including the status reconciliation
//! protocol.

pub(crate) mod model;
mod repository;

pub use model::LinkedAccountDB;
pub use repository::LinkedAccountRepository;
