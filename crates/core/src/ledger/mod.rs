//! Per-account transaction ledger: models, merge engine, store contract.

mod merge;
mod model;
mod traits;

pub use merge::*;
pub use model::*;
pub use traits::*;
