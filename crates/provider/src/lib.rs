//! HTTP adapter for the transaction aggregation provider.

mod client;
mod error;
mod models;

pub use client::AggregationApiClient;
pub use error::{ApiRetryClass, ProviderApiError, Result};
pub use models::*;
