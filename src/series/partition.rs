// ============================================================================
// Stride Partition
// Assigns term indices to workers by residue class modulo the group size
// ============================================================================

use std::iter::FusedIterator;

/// Term indices owned by one rank: `rank, rank + group_size, …` below
/// `term_count`, in strictly increasing order.
///
/// The iterator is cheap to clone and holds no hidden state, so it can be
/// regenerated or restarted at will. Over all ranks of a group the sets are
/// pairwise disjoint and cover `0..term_count` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StridePartition {
    next: u64,
    stride: u64,
    end: u64,
}

/// Indices owned by `rank` in a group of `group_size` summing `term_count`
/// terms. A `group_size` of 0 or a rank outside the group owns nothing.
pub fn owned_terms(rank: usize, group_size: usize, term_count: u64) -> StridePartition {
    StridePartition::new(rank as u64, group_size as u64, term_count)
}

impl StridePartition {
    pub fn new(rank: u64, group_size: u64, term_count: u64) -> Self {
        // Outside the group nothing is owned; park the cursor past the end
        let next = if rank >= group_size { term_count } else { rank };
        Self {
            next,
            stride: group_size.max(1),
            end: term_count,
        }
    }

    /// True when this rank owns no terms at all.
    pub fn is_idle(&self) -> bool {
        self.next >= self.end
    }
}

impl Iterator for StridePartition {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.end {
            return None;
        }
        let current = self.next;
        self.next = current.saturating_add(self.stride);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next >= self.end {
            0
        } else {
            (self.end - self.next - 1) / self.stride + 1
        };
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StridePartition {}

impl FusedIterator for StridePartition {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stride_layout() {
        assert_eq!(owned_terms(1, 4, 11).collect::<Vec<_>>(), vec![1, 5, 9]);
        assert_eq!(owned_terms(0, 1, 4).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(owned_terms(3, 4, 3).count(), 0);
    }

    #[test]
    fn test_exact_size() {
        let terms = owned_terms(2, 3, 20);
        assert_eq!(terms.len(), terms.clone().count());
        assert_eq!(terms.len(), 6);
    }

    #[test]
    fn test_idle_rank_when_group_exceeds_terms() {
        let terms = owned_terms(12, 16, 11);
        assert!(terms.is_idle());
        assert_eq!(terms.len(), 0);
    }

    #[test]
    fn test_rank_outside_group_owns_nothing() {
        assert!(owned_terms(4, 4, 20).is_idle());
        assert_eq!(owned_terms(9, 4, 20).count(), 0);
        assert_eq!(owned_terms(0, 0, 20).count(), 0);
    }

    #[test]
    fn test_restartable() {
        let terms = owned_terms(1, 3, 10);
        let first: Vec<u64> = terms.clone().collect();
        let second: Vec<u64> = terms.collect();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_partition_is_complete_and_disjoint(group_size in 1usize..64, term_count in 0u64..500) {
            let mut seen = vec![0u32; term_count as usize];
            for rank in 0..group_size {
                let mut previous = None;
                for k in owned_terms(rank, group_size, term_count) {
                    prop_assert!(k < term_count);
                    prop_assert_eq!(k as usize % group_size, rank);
                    if let Some(p) = previous {
                        prop_assert!(k > p);
                    }
                    previous = Some(k);
                    seen[k as usize] += 1;
                }
            }
            prop_assert!(seen.iter().all(|count| *count == 1));
        }
    }
}
