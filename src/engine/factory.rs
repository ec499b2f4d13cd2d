// ============================================================================
// Group Launcher
// Starts a worker group, runs it to completion and hands back the result
// ============================================================================

use crate::domain::{ComputeConfig, DigitRequest, PrecisionMargins, WorkerIdentity};
use crate::engine::worker::{FinalResult, Worker, WorkerOutcome};
use crate::errors::{ComputeError, ComputeResult};
use crate::interfaces::{Communicator, EventHandler, NoOpEventHandler};
use crate::transport::{ChannelGroup, PipeCommunicator};
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// Launch Functions
// ============================================================================

/// Runs a group of `group_size` workers as threads of this process.
///
/// Everything is validated before any thread starts. Rank 0 runs on the
/// calling thread; ranks `1..group_size` run on scoped threads.
///
/// # Example
/// ```
/// use bbp_pi::prelude::*;
/// use bbp_pi::engine::factory::run_threaded;
/// use std::sync::Arc;
///
/// let config = ComputeConfig::from_raw_digits(20).unwrap();
/// let result = run_threaded(config, 3, Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(result.digits().unwrap(), "14159265358979323846");
/// ```
pub fn run_threaded(
    config: ComputeConfig,
    group_size: usize,
    event_handler: Arc<dyn EventHandler>,
) -> ComputeResult<FinalResult> {
    // Validate configuration first
    config.validate()?;
    let coordinator_identity = WorkerIdentity::coordinator(group_size)?;

    let mut endpoints = ChannelGroup::create(group_size).into_iter();
    let coordinator_comm = endpoints.next().ok_or(ComputeError::InvalidGroup {
        rank: 0,
        group_size,
    })?;

    let scoped = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = endpoints
            .map(|comm| {
                let rank = comm.rank();
                let config = config.clone();
                let events = Arc::clone(&event_handler);
                let handle = scope.spawn(move |_| -> ComputeResult<()> {
                    let identity = WorkerIdentity::new(rank, group_size)?;
                    Worker::new(identity, config, comm, events).run()?;
                    Ok(())
                });
                (rank, handle)
            })
            .collect();

        let coordinator_outcome = Worker::new(
            coordinator_identity,
            config.clone(),
            coordinator_comm,
            Arc::clone(&event_handler),
        )
        .run();

        let mut worker_failure = None;
        for (rank, handle) in handles {
            let failure = match handle.join() {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err,
                Err(_) => ComputeError::WorkerPanicked { rank },
            };
            tracing::warn!(rank, error = %failure, "worker failed");
            if worker_failure.is_none() {
                worker_failure = Some(failure);
            }
        }

        settle(coordinator_outcome, worker_failure)
    });

    scoped.map_err(|_| ComputeError::WorkerPanicked {
        rank: coordinator_identity.rank(),
    })?
}

/// Runs a group of `group_size` workers as OS processes.
///
/// This process becomes rank 0 and launches `program args…` once per other
/// rank; each child must call [`run_process_worker`].
pub fn run_processes(
    config: ComputeConfig,
    group_size: usize,
    program: &Path,
    args: &[OsString],
    event_handler: Arc<dyn EventHandler>,
) -> ComputeResult<FinalResult> {
    config.validate()?;
    let identity = WorkerIdentity::coordinator(group_size)?;
    let comm = PipeCommunicator::spawn_group(program, args, group_size)?;

    let mut coordinator = Worker::new(identity, config, comm, event_handler);
    let outcome = coordinator.run();
    let comm = coordinator.into_communicator();
    let reaped = if outcome.is_ok() {
        comm.finish()
    } else {
        comm.abort()
    };

    settle(outcome, reaped.err().map(ComputeError::from))
}

/// Runs this process as the worker described by `comm`.
pub fn run_process_worker(
    comm: PipeCommunicator,
    config: ComputeConfig,
    event_handler: Arc<dyn EventHandler>,
) -> ComputeResult<()> {
    config.validate()?;
    let identity = comm.identity()?;
    let mut worker = Worker::new(identity, config, comm, event_handler);
    worker.run()?;
    Ok(())
}

/// A worker failure is the root cause of whatever the coordinator saw.
fn settle(
    coordinator_outcome: ComputeResult<WorkerOutcome>,
    worker_failure: Option<ComputeError>,
) -> ComputeResult<FinalResult> {
    if let Some(err) = worker_failure {
        return Err(err);
    }
    coordinator_outcome?
        .into_result()
        .ok_or(ComputeError::InvalidGroup {
            rank: 0,
            group_size: 0,
        })
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for a computation with fluent API
///
/// The digit count is checked when the computation runs, so a rejected
/// request never starts a worker.
///
/// # Example
/// ```
/// use bbp_pi::engine::factory::ComputationBuilder;
///
/// let result = ComputationBuilder::new()
///     .digits(30)
///     .workers(4)
///     .run_threaded()
///     .unwrap();
/// assert!(result.render().unwrap().starts_with("3.1415926535"));
/// ```
pub struct ComputationBuilder {
    digits: i64,
    workers: usize,
    margins: PrecisionMargins,
    event_handler: Arc<dyn EventHandler>,
}

impl ComputationBuilder {
    /// Defaults: 100 digits, one worker, standard margins, no events
    pub fn new() -> Self {
        Self {
            digits: i64::try_from(DigitRequest::default().get()).unwrap_or(i64::MAX),
            workers: 1,
            margins: PrecisionMargins::standard(),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Set the number of fractional digits
    pub fn digits(mut self, digits: i64) -> Self {
        self.digits = digits;
        self
    }

    /// Set the group size
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set precision margins
    pub fn margins(mut self, margins: PrecisionMargins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the event handler
    pub fn event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    /// Validated configuration without running (for inspection)
    pub fn config(&self) -> ComputeResult<ComputeConfig> {
        let config = ComputeConfig::from_raw_digits(self.digits)?.with_margins(self.margins.clone());
        config.validate()?;
        Ok(config)
    }

    /// Run with one thread per worker
    pub fn run_threaded(self) -> ComputeResult<FinalResult> {
        let config = self.config()?;
        run_threaded(config, self.workers, self.event_handler)
    }

    /// Run with one process per worker, launching `program args…`
    pub fn run_processes(self, program: &Path, args: &[OsString]) -> ComputeResult<FinalResult> {
        let config = self.config()?;
        run_processes(config, self.workers, program, args, self.event_handler)
    }
}

impl Default for ComputationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
