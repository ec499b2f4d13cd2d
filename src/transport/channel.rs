// ============================================================================
// Channel Transport
// In-process worker group: one thread per worker, one channel per rank pair
// ============================================================================

use crate::interfaces::Communicator;
use crate::transport::errors::TransportError;
use crossbeam::channel::{unbounded, Receiver, Sender};

/// Endpoint of one worker in a [`ChannelGroup`].
///
/// Owns the sending half of every channel leaving this rank and the
/// receiving half of every channel arriving at it. Frames are moved as owned
/// buffers, so workers still share nothing but bytes in flight.
#[derive(Debug)]
pub struct ChannelCommunicator {
    rank: usize,
    size: usize,
    /// Indexed by destination rank
    outboxes: Vec<Sender<Vec<u8>>>,
    /// Indexed by source rank
    inboxes: Vec<Receiver<Vec<u8>>>,
}

/// Factory for a fully connected group of channel endpoints.
pub struct ChannelGroup;

impl ChannelGroup {
    /// One endpoint per rank, in rank order.
    pub fn create(size: usize) -> Vec<ChannelCommunicator> {
        let mut outboxes: Vec<Vec<Sender<Vec<u8>>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut inboxes: Vec<Vec<Receiver<Vec<u8>>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();

        for source in 0..size {
            for dest in 0..size {
                let (tx, rx) = unbounded();
                outboxes[source].push(tx);
                inboxes[dest].push(rx);
            }
        }

        outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outboxes, inboxes))| ChannelCommunicator {
                rank,
                size,
                outboxes,
                inboxes,
            })
            .collect()
    }
}

impl Communicator for ChannelCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: usize, frame: &[u8]) -> Result<(), TransportError> {
        let outbox = self.outboxes.get(dest).ok_or(TransportError::RouteUnavailable {
            from: self.rank,
            to: dest,
        })?;
        outbox
            .send(frame.to_vec())
            .map_err(|_| TransportError::ChannelClosed { peer: dest })
    }

    fn recv(&self, source: usize, capacity: usize) -> Result<Vec<u8>, TransportError> {
        let inbox = self.inboxes.get(source).ok_or(TransportError::RouteUnavailable {
            from: source,
            to: self.rank,
        })?;
        let frame = inbox
            .recv()
            .map_err(|_| TransportError::ChannelClosed { peer: source })?;

        if frame.len() > capacity {
            return Err(TransportError::Truncated {
                source,
                len: frame.len(),
                capacity,
            });
        }
        Ok(frame)
    }
}
