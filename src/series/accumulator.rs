// ============================================================================
// Local Accumulator
// Folds a worker's owned terms into one partial sum
// ============================================================================

use crate::numeric::{BigFixed, NumericResult};
use crate::series::term::TermEvaluator;

/// One worker's share of the series, owned by that worker until serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSum {
    value: BigFixed,
    terms_summed: usize,
}

impl PartialSum {
    /// The additive identity: what a rank without terms contributes.
    pub fn empty(working_bits: u64) -> Self {
        Self {
            value: BigFixed::zero(working_bits),
            terms_summed: 0,
        }
    }

    #[inline]
    pub fn value(&self) -> &BigFixed {
        &self.value
    }

    #[inline]
    pub fn terms_summed(&self) -> usize {
        self.terms_summed
    }

    pub fn into_value(self) -> BigFixed {
        self.value
    }
}

/// Sum `term(k)` for every `k` in `terms`, in iteration order, starting from
/// zero.
pub fn accumulate<I>(terms: I, working_bits: u64) -> NumericResult<PartialSum>
where
    I: IntoIterator<Item = u64>,
{
    let evaluator = TermEvaluator::new(working_bits);
    let mut sum = PartialSum::empty(working_bits);

    for k in terms {
        let term = evaluator.evaluate(k)?;
        sum.value = sum.value.checked_add(&term)?;
        sum.terms_summed += 1;
    }

    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::partition::owned_terms;

    const BITS: u64 = 200;

    #[test]
    fn test_empty_terms_yield_exact_zero() {
        let sum = accumulate(std::iter::empty(), BITS).unwrap();
        assert!(sum.value().is_zero());
        assert_eq!(sum.terms_summed(), 0);
        assert_eq!(sum, PartialSum::empty(BITS));
    }

    #[test]
    fn test_full_range_approaches_pi() {
        let sum = accumulate(0..30, BITS).unwrap();
        assert_eq!(sum.terms_summed(), 30);
        assert_eq!(
            sum.value().to_decimal_string(30).unwrap(),
            "3.141592653589793238462643383279"
        );
    }

    #[test]
    fn test_strided_sums_add_up_to_full_sum() {
        let whole = accumulate(0..40, BITS).unwrap().into_value();

        let mut total = BigFixed::zero(BITS);
        for rank in 0..3 {
            let part = accumulate(owned_terms(rank, 3, 40), BITS).unwrap();
            total = total.checked_add(part.value()).unwrap();
        }

        // Fixed-point addition is exact, so regrouping changes nothing
        assert_eq!(total, whole);
    }
}
