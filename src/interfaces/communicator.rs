// ============================================================================
// Communicator Interface
// Defines the contract for point-to-point exchange between workers
// ============================================================================

use crate::domain::WorkerIdentity;
use crate::errors::ComputeError;
use crate::transport::TransportError;

/// Blocking, point-to-point message passing within a flat worker group.
/// Implementations: in-process channels (one thread per worker) and OS pipes
/// (one process per worker).
///
/// Frames are owned byte buffers; no numeric state is shared between
/// workers.
pub trait Communicator: Send {
    /// This worker's rank
    fn rank(&self) -> usize;

    /// Number of workers in the group
    fn size(&self) -> usize;

    /// Deliver one frame to `dest`. Blocks until the frame is handed to the
    /// channel.
    fn send(&self, dest: usize, frame: &[u8]) -> Result<(), TransportError>;

    /// Receive the next frame from `source`, failing rather than truncating
    /// when it exceeds `capacity` bytes. Blocks until a frame arrives or the
    /// peer goes away.
    fn recv(&self, source: usize, capacity: usize) -> Result<Vec<u8>, TransportError>;

    /// Worker identity derived from rank and size
    fn identity(&self) -> Result<WorkerIdentity, ComputeError> {
        WorkerIdentity::new(self.rank(), self.size())
    }
}
