// ============================================================================
// Worker Identity
// Rank and group size supplied by the execution environment
// ============================================================================

use crate::errors::ComputeError;
use std::fmt;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rank of the worker that aggregates and renders.
pub const COORDINATOR_RANK: usize = 0;

/// Position of one worker inside a flat worker group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkerIdentity {
    rank: usize,
    group_size: usize,
}

impl WorkerIdentity {
    /// # Errors
    /// Returns `InvalidGroup` unless `group_size >= 1` and `rank < group_size`.
    pub fn new(rank: usize, group_size: usize) -> Result<Self, ComputeError> {
        if group_size == 0 || rank >= group_size {
            return Err(ComputeError::InvalidGroup { rank, group_size });
        }
        Ok(Self { rank, group_size })
    }

    /// Identity of the coordinator in a group of `group_size`.
    pub fn coordinator(group_size: usize) -> Result<Self, ComputeError> {
        Self::new(COORDINATOR_RANK, group_size)
    }

    #[inline]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub const fn group_size(&self) -> usize {
        self.group_size
    }

    #[inline]
    pub const fn is_coordinator(&self) -> bool {
        self.rank == COORDINATOR_RANK
    }

    /// Ranks the coordinator receives from, in increasing order.
    pub fn contributors(&self) -> Range<usize> {
        COORDINATOR_RANK + 1..self.group_size
    }
}

impl fmt::Display for WorkerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.rank, self.group_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identity() {
        let id = WorkerIdentity::new(2, 4).unwrap();
        assert_eq!(id.rank(), 2);
        assert_eq!(id.group_size(), 4);
        assert!(!id.is_coordinator());
        assert_eq!(id.to_string(), "2/4");
    }

    #[test]
    fn test_invalid_identity() {
        assert!(WorkerIdentity::new(0, 0).is_err());
        assert!(WorkerIdentity::new(4, 4).is_err());
    }

    #[test]
    fn test_contributors() {
        let coord = WorkerIdentity::coordinator(4).unwrap();
        assert!(coord.is_coordinator());
        assert_eq!(coord.contributors().collect::<Vec<_>>(), vec![1, 2, 3]);

        let alone = WorkerIdentity::coordinator(1).unwrap();
        assert_eq!(alone.contributors().count(), 0);
    }
}
