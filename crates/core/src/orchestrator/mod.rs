//! Batch orchestrator.
//!
//! Runs a batch through the converter sequentially, keeps going past
//! per-file failures, and publishes synthetic progress while it works.

mod config;
mod progress;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use progress::{advance, ProgressTicker};
pub use runner::BatchOrchestrator;
pub use types::{FileUpdate, OrchestratorError, RunOutcome};
