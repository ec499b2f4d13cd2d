// ============================================================================
// Engine Module
// Runs the worker group: per-process driver, aggregation and launchers
// ============================================================================

mod aggregator;
mod worker;

pub mod factory;

pub use aggregator::{aggregate, Aggregator};
pub use factory::{run_process_worker, run_processes, run_threaded, ComputationBuilder};
pub use worker::{FinalResult, Worker, WorkerOutcome};
