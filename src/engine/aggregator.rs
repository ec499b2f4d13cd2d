// ============================================================================
// Aggregator
// Folds every worker's partial sum into the coordinator's running total
// ============================================================================

use crate::domain::COORDINATOR_RANK;
use crate::errors::{ComputeError, ComputeResult};
use crate::numeric::BigFixed;

/// Coordinator-side accumulator for received partial sums.
///
/// Starts from the coordinator's own local sum and accepts exactly one value
/// from each of ranks `1..group_size`.
#[derive(Debug)]
pub struct Aggregator {
    total: BigFixed,
    /// Indexed by rank; slot 0 stays unused
    seen: Vec<bool>,
    received: usize,
}

impl Aggregator {
    pub fn new(group_size: usize, local: BigFixed) -> Self {
        Self {
            total: local,
            seen: vec![false; group_size],
            received: 0,
        }
    }

    /// Number of contributions still outstanding
    pub fn pending(&self) -> usize {
        self.expected().saturating_sub(self.received)
    }

    fn expected(&self) -> usize {
        self.seen.len().saturating_sub(1)
    }

    /// Add the partial sum received from `source`.
    ///
    /// # Errors
    /// `UnexpectedContribution` for the coordinator's own rank, a rank outside
    /// the group or a rank that already contributed.
    pub fn absorb(&mut self, source: usize, value: &BigFixed) -> ComputeResult<()> {
        if source == COORDINATOR_RANK {
            return Err(ComputeError::UnexpectedContribution { source });
        }
        match self.seen.get_mut(source) {
            Some(seen) if !*seen => {
                self.total = self.total.checked_add(value)?;
                *seen = true;
                self.received += 1;
                Ok(())
            },
            _ => Err(ComputeError::UnexpectedContribution { source }),
        }
    }

    /// The final sum.
    ///
    /// # Errors
    /// `MissingContributions` unless every worker contributed.
    pub fn finish(self) -> ComputeResult<BigFixed> {
        let expected = self.expected();
        if self.received != expected {
            return Err(ComputeError::MissingContributions {
                expected,
                received: self.received,
            });
        }
        Ok(self.total)
    }
}

/// Sum a local value and received values in the order given.
pub fn aggregate<'a, I>(local: &BigFixed, received: I) -> ComputeResult<BigFixed>
where
    I: IntoIterator<Item = &'a BigFixed>,
{
    received
        .into_iter()
        .try_fold(local.clone(), |total, value| Ok(total.checked_add(value)?))
}
