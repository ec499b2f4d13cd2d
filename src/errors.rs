// ============================================================================
// Compute Errors
// Top-level error taxonomy for a distributed pi computation
// ============================================================================

use crate::domain::state::{ProcessState, ProcessTransition};
use crate::numeric::NumericError;
use crate::transport::TransportError;
use std::fmt;

/// Exit code for a rejected digit request.
pub const EXIT_INVALID_INPUT: i32 = 1;

/// Exit code for every other fatal failure.
pub const EXIT_FAILURE: i32 = 2;

/// Errors that abort a computation.
///
/// Every variant is fatal for the whole worker group: no partial result is
/// ever produced and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// Requested digit count below 1
    InvalidDigitCount(i64),
    /// Rank outside `[0, group_size)` or an empty group
    InvalidGroup { rank: usize, group_size: usize },
    /// Precision margins or other settings failed validation
    InvalidConfig(String),
    /// The per-process state machine was driven out of order
    InvalidTransition {
        from: ProcessState,
        via: ProcessTransition,
    },
    /// Aggregation attempted before every partial sum arrived
    MissingContributions { expected: usize, received: usize },
    /// A partial sum arrived from a rank that may not contribute (again)
    UnexpectedContribution { source: usize },
    /// A worker thread panicked
    WorkerPanicked { rank: usize },
    Numeric(NumericError),
    Transport(TransportError),
}

impl ComputeError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ComputeError::InvalidDigitCount(_) => EXIT_INVALID_INPUT,
            _ => EXIT_FAILURE,
        }
    }
}

impl fmt::Display for ComputeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeError::InvalidDigitCount(digits) => {
                write!(f, "digit count must be at least 1 (got {})", digits)
            },
            ComputeError::InvalidGroup { rank, group_size } => {
                write!(f, "invalid worker identity: rank {} in group of {}", rank, group_size)
            },
            ComputeError::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
            ComputeError::InvalidTransition { from, via } => {
                write!(f, "invalid transition from {:?} via {:?}", from, via)
            },
            ComputeError::MissingContributions { expected, received } => write!(
                f,
                "aggregation needs {} partial sums, received {}",
                expected, received
            ),
            ComputeError::UnexpectedContribution { source } => {
                write!(f, "unexpected partial sum from rank {}", source)
            },
            ComputeError::WorkerPanicked { rank } => write!(f, "worker {} panicked", rank),
            ComputeError::Numeric(err) => write!(f, "{}", err),
            ComputeError::Transport(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ComputeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComputeError::Numeric(err) => Some(err),
            ComputeError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NumericError> for ComputeError {
    fn from(error: NumericError) -> Self {
        ComputeError::Numeric(error)
    }
}

impl From<TransportError> for ComputeError {
    fn from(error: TransportError) -> Self {
        ComputeError::Transport(error)
    }
}

/// Result type alias for compute operations
pub type ComputeResult<T> = Result<T, ComputeError>;
