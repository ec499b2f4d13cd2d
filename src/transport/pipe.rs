// ============================================================================
// Pipe Transport
// Multi-process worker group: the coordinator launches one OS process per
// worker and reads each worker's frame from its stdout pipe
// ============================================================================
//
// Rank and group size reach a worker process through the environment, the
// same way an MPI launcher hands them out. A worker's stdout carries nothing
// but its single frame; diagnostics go to stderr.

use crate::domain::{WorkerIdentity, COORDINATOR_RANK};
use crate::errors::ComputeError;
use crate::interfaces::Communicator;
use crate::transport::errors::TransportError;
use parking_lot::Mutex;
use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Environment variable carrying a worker's rank.
pub const RANK_ENV: &str = "BBP_PI_RANK";

/// Environment variable carrying the group size.
pub const SIZE_ENV: &str = "BBP_PI_SIZE";

struct WorkerProcess {
    rank: usize,
    child: Child,
    reader: BufReader<ChildStdout>,
    /// Stdout reached EOF: the child has exited or is about to
    closed: bool,
}

enum Endpoint {
    /// Rank 0: owns every child and its pipe, indexed by `rank - 1`
    Coordinator(Mutex<Vec<WorkerProcess>>),
    /// Rank ≥ 1: writes its frame to stdout
    Worker(Mutex<io::Stdout>),
}

/// Endpoint of one process in a pipe-connected worker group.
///
/// Only worker → coordinator routes exist.
pub struct PipeCommunicator {
    rank: usize,
    size: usize,
    endpoint: Endpoint,
}

impl PipeCommunicator {
    /// Launch `size - 1` worker processes running `program args…` and return
    /// the coordinator's endpoint.
    ///
    /// If any launch fails, the workers already started are killed.
    pub fn spawn_group(
        program: &Path,
        args: &[OsString],
        size: usize,
    ) -> Result<Self, ComputeError> {
        let identity = WorkerIdentity::coordinator(size)?;
        let mut workers: Vec<WorkerProcess> = Vec::with_capacity(size.saturating_sub(1));

        for rank in identity.contributors() {
            match spawn_worker(program, args, rank, size) {
                Ok(worker) => workers.push(worker),
                Err(err) => {
                    tracing::warn!(rank, error = %err, "failed to launch worker process");
                    for mut started in workers {
                        reap(&mut started.child);
                    }
                    return Err(err.into());
                },
            }
        }

        tracing::debug!(workers = workers.len(), "worker processes launched");
        Ok(Self {
            rank: COORDINATOR_RANK,
            size,
            endpoint: Endpoint::Coordinator(Mutex::new(workers)),
        })
    }

    /// Worker endpoint described by the environment, or `None` when this
    /// process was not launched as a worker.
    ///
    /// # Errors
    /// `InvalidGroup` when the variables are malformed or name the
    /// coordinator's rank.
    pub fn from_env() -> Result<Option<Self>, ComputeError> {
        let Some(raw_rank) = std::env::var_os(RANK_ENV) else {
            return Ok(None);
        };
        let raw_size = std::env::var_os(SIZE_ENV).unwrap_or_default();

        let parse = |raw: &OsString| raw.to_str().and_then(|s| s.trim().parse::<usize>().ok());
        let (rank, size) = match (parse(&raw_rank), parse(&raw_size)) {
            (Some(rank), Some(size)) => (rank, size),
            _ => {
                return Err(ComputeError::InvalidGroup {
                    rank: usize::MAX,
                    group_size: 0,
                })
            },
        };

        let identity = WorkerIdentity::new(rank, size)?;
        if identity.is_coordinator() {
            return Err(ComputeError::InvalidGroup {
                rank,
                group_size: size,
            });
        }

        Ok(Some(Self {
            rank,
            size,
            endpoint: Endpoint::Worker(Mutex::new(io::stdout())),
        }))
    }

    /// Wait for every worker process and check its exit status.
    ///
    /// A no-op for worker endpoints.
    pub fn finish(self) -> Result<(), TransportError> {
        let Endpoint::Coordinator(workers) = &self.endpoint else {
            return Ok(());
        };

        let workers = std::mem::take(&mut *workers.lock());
        let mut first_failure = None;
        for mut worker in workers {
            let status = worker.child.wait()?;
            if !status.success() {
                tracing::warn!(rank = worker.rank, ?status, "worker process failed");
                if first_failure.is_none() {
                    first_failure = Some(TransportError::WorkerFailed {
                        rank: worker.rank,
                        code: status.code(),
                    });
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl PipeCommunicator {
    /// Stop the group after a coordinator failure.
    ///
    /// Workers that already exited unsuccessfully are reported; the rest are
    /// killed without waiting for their frames.
    pub fn abort(self) -> Result<(), TransportError> {
        let Endpoint::Coordinator(workers) = &self.endpoint else {
            return Ok(());
        };

        let workers = std::mem::take(&mut *workers.lock());
        let mut first_failure = None;
        for mut worker in workers {
            // A closed pipe means the exit status is imminent; collect it
            // instead of racing it with a kill
            let status = if worker.closed {
                Some(worker.child.wait()?)
            } else {
                worker.child.try_wait()?
            };
            match status {
                Some(status) if !status.success() => {
                    tracing::warn!(rank = worker.rank, ?status, "worker process failed");
                    if first_failure.is_none() {
                        first_failure = Some(TransportError::WorkerFailed {
                            rank: worker.rank,
                            code: status.code(),
                        });
                    }
                },
                Some(_) => {},
                None => reap(&mut worker.child),
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn spawn_worker(
    program: &Path,
    args: &[OsString],
    rank: usize,
    size: usize,
) -> Result<WorkerProcess, TransportError> {
    let mut child = Command::new(program)
        .args(args)
        .env(RANK_ENV, rank.to_string())
        .env(SIZE_ENV, size.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    let Some(stdout) = child.stdout.take() else {
        reap(&mut child);
        return Err(TransportError::Io(format!(
            "worker {} started without a stdout pipe",
            rank
        )));
    };

    Ok(WorkerProcess {
        rank,
        child,
        reader: BufReader::new(stdout),
        closed: false,
    })
}

/// Kill and wait, ignoring failures: the process may already be gone.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl Communicator for PipeCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: usize, frame: &[u8]) -> Result<(), TransportError> {
        match &self.endpoint {
            Endpoint::Worker(stdout) if dest == COORDINATOR_RANK => {
                let mut out = stdout.lock();
                out.write_all(frame)?;
                out.flush()?;
                Ok(())
            },
            _ => Err(TransportError::RouteUnavailable {
                from: self.rank,
                to: dest,
            }),
        }
    }

    fn recv(&self, source: usize, capacity: usize) -> Result<Vec<u8>, TransportError> {
        let Endpoint::Coordinator(workers) = &self.endpoint else {
            return Err(TransportError::RouteUnavailable {
                from: source,
                to: self.rank,
            });
        };

        let mut workers = workers.lock();
        let worker = source
            .checked_sub(1)
            .and_then(|index| workers.get_mut(index))
            .ok_or(TransportError::RouteUnavailable {
                from: source,
                to: self.rank,
            })?;

        // Read at most one byte past the capacity to detect oversized frames
        let limit = u64::try_from(capacity).unwrap_or(u64::MAX).saturating_add(1);
        let mut frame = Vec::with_capacity(capacity);
        (&mut worker.reader).take(limit).read_until(0, &mut frame)?;

        if frame.len() > capacity {
            return Err(TransportError::Truncated {
                source,
                len: frame.len(),
                capacity,
            });
        }
        if frame.last() != Some(&0) {
            worker.closed = true;
            return Err(TransportError::ChannelClosed { peer: source });
        }
        Ok(frame)
    }
}

impl Drop for PipeCommunicator {
    fn drop(&mut self) {
        if let Endpoint::Coordinator(workers) = &self.endpoint {
            for worker in workers.lock().iter_mut() {
                reap(&mut worker.child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_process_group_spawns_nothing() {
        let comm = PipeCommunicator::spawn_group(Path::new("/nonexistent"), &[], 1).unwrap();
        assert_eq!(comm.rank(), 0);
        assert_eq!(comm.size(), 1);
        assert!(comm.finish().is_ok());
    }

    #[test]
    fn test_launch_failure_is_reported() {
        let result = PipeCommunicator::spawn_group(Path::new("/nonexistent/bbp-pi"), &[], 2);
        assert!(matches!(
            result,
            Err(ComputeError::Transport(TransportError::Io(_)))
        ));
    }

    #[test]
    fn test_empty_group_rejected() {
        assert!(matches!(
            PipeCommunicator::spawn_group(Path::new("/nonexistent"), &[], 0),
            Err(ComputeError::InvalidGroup { .. })
        ));
    }

    #[test]
    fn test_coordinator_cannot_send() {
        let comm = PipeCommunicator::spawn_group(Path::new("/nonexistent"), &[], 1).unwrap();
        assert_eq!(
            comm.send(0, b"x\0"),
            Err(TransportError::RouteUnavailable { from: 0, to: 0 })
        );
        assert!(comm.recv(1, 16).is_err());
    }

    #[cfg(unix)]
    fn shell_group(script: &str) -> PipeCommunicator {
        let args = [OsString::from("-c"), OsString::from(script)];
        PipeCommunicator::spawn_group(Path::new("/bin/sh"), &args, 2).unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_receives_frame_from_child() {
        let comm = shell_group(r"printf '1.5\000'");
        assert_eq!(comm.recv(1, 16).unwrap(), b"1.5\0".to_vec());
        assert!(comm.finish().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_oversized_child_frame_is_rejected() {
        let comm = shell_group("printf '%017d' 0");
        assert_eq!(
            comm.recv(1, 16),
            Err(TransportError::Truncated {
                source: 1,
                len: 17,
                capacity: 16
            })
        );
        assert!(comm.abort().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_unterminated_child_frame_is_closed_channel() {
        let comm = shell_group("printf 12");
        assert_eq!(
            comm.recv(1, 16),
            Err(TransportError::ChannelClosed { peer: 1 })
        );
        assert!(comm.abort().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_abort_keeps_exit_status_of_dead_worker() {
        let comm = shell_group("exit 3");
        assert_eq!(
            comm.recv(1, 16),
            Err(TransportError::ChannelClosed { peer: 1 })
        );
        assert_eq!(
            comm.abort(),
            Err(TransportError::WorkerFailed {
                rank: 1,
                code: Some(3)
            })
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_finish_reports_failed_worker() {
        let comm = shell_group(r"printf '0\000'; exit 5");
        assert!(comm.recv(1, 16).is_ok());
        assert_eq!(
            comm.finish(),
            Err(TransportError::WorkerFailed {
                rank: 1,
                code: Some(5)
            })
        );
    }
}
