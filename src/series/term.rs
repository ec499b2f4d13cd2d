// ============================================================================
// Term Evaluator
// k-th BBP term: (1/16^k) × [4/(8k+1) − 2/(8k+4) − 1/(8k+5) − 1/(8k+6)]
// ============================================================================

use crate::numeric::{BigFixed, NumericError, NumericResult};

/// Numerator and denominator offset of each bracketed component; the first
/// is added, the rest subtracted.
const COMPONENTS: [(u64, u64); 4] = [(4, 1), (2, 4), (1, 5), (1, 6)];

/// Each term is scaled by 16^-k.
const TERM_BASE: u64 = 16;

/// Denominators `[8k+1, 8k+4, 8k+5, 8k+6]`, all strictly positive.
///
/// # Errors
/// Returns `Overflow` when `8k+6` exceeds `u64`.
pub fn denominators(k: u64) -> NumericResult<[u64; 4]> {
    let k8 = k.checked_mul(8).ok_or(NumericError::Overflow)?;
    let mut out = [0u64; 4];
    for (slot, (_, offset)) in out.iter_mut().zip(COMPONENTS) {
        *slot = k8.checked_add(offset).ok_or(NumericError::Overflow)?;
    }
    Ok(out)
}

/// Value of term `k` with `working_bits` fractional bits.
///
/// Every intermediate is an owned value dropped before return.
pub fn term(k: u64, working_bits: u64) -> NumericResult<BigFixed> {
    let dens = denominators(k)?;

    let (lead_num, _) = COMPONENTS[0];
    let mut bracket = BigFixed::from_ratio(lead_num, dens[0], working_bits)?;
    for ((numerator, _), denominator) in COMPONENTS.iter().zip(dens).skip(1) {
        let part = BigFixed::from_ratio(*numerator, denominator, working_bits)?;
        bracket = bracket.checked_sub(&part)?;
    }

    bracket.checked_div_pow(TERM_BASE, k)
}

/// Term evaluator bound to one working precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermEvaluator {
    working_bits: u64,
}

impl TermEvaluator {
    pub fn new(working_bits: u64) -> Self {
        Self { working_bits }
    }

    #[inline]
    pub fn working_bits(&self) -> u64 {
        self.working_bits
    }

    #[inline]
    pub fn evaluate(&self, k: u64) -> NumericResult<BigFixed> {
        term(k, self.working_bits)
    }
}
