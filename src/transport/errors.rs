// ============================================================================
// Transport Errors
// Failures while moving serialized partial sums between workers
// ============================================================================

use std::fmt;

/// Errors raised by the wire codec and the point-to-point channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Serialized frame does not fit the provisioned wire capacity
    PayloadTooLarge { len: usize, capacity: usize },
    /// Received frame exceeds the receiver's buffer
    Truncated {
        source: usize,
        len: usize,
        capacity: usize,
    },
    /// Frame lacks its NUL terminator
    MissingTerminator,
    /// Frame is not a base-10 fixed-point record
    InvalidEncoding,
    /// No channel between these ranks
    RouteUnavailable { from: usize, to: usize },
    /// Peer went away before the exchange completed
    ChannelClosed { peer: usize },
    /// Worker process exited unsuccessfully
    WorkerFailed { rank: usize, code: Option<i32> },
    /// Underlying I/O failure
    Io(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::PayloadTooLarge { len, capacity } => write!(
                f,
                "serialized partial sum needs {} bytes, wire capacity is {}",
                len, capacity
            ),
            TransportError::Truncated {
                source,
                len,
                capacity,
            } => write!(
                f,
                "frame from rank {} exceeds receive buffer ({} > {} bytes)",
                source, len, capacity
            ),
            TransportError::MissingTerminator => write!(f, "frame is missing its terminator"),
            TransportError::InvalidEncoding => write!(f, "frame is not a decimal number"),
            TransportError::RouteUnavailable { from, to } => {
                write!(f, "no route from rank {} to rank {}", from, to)
            },
            TransportError::ChannelClosed { peer } => {
                write!(f, "channel to rank {} closed", peer)
            },
            TransportError::WorkerFailed { rank, code } => match code {
                Some(code) => write!(f, "worker {} exited with code {}", rank, code),
                None => write!(f, "worker {} was terminated by a signal", rank),
            },
            TransportError::Io(message) => write!(f, "transport I/O error: {}", message),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(error: std::io::Error) -> Self {
        TransportError::Io(error.to_string())
    }
}
