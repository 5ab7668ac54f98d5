//! Sync domain: configuration, window policy, item locks, orchestrator.

mod config;
mod locks;
mod orchestrator;
mod windows;

pub use config::*;
pub use locks::*;
pub use orchestrator::*;
pub use windows::*;
