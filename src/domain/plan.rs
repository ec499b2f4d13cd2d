// ============================================================================
// Precision Planner
// Derives working precision and series length from a digit request
// ============================================================================

use crate::domain::config::PrecisionMargins;
use crate::domain::request::DigitRequest;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How much precision and how many terms a run needs.
///
/// A pure function of the digit request and the margins, so every process
/// derives the same plan independently and nothing is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecisionPlan {
    /// Fractional digits requested
    pub digits: u64,

    /// Fractional bits carried by every intermediate value
    pub working_bits: u64,

    /// Number of series terms summed (indices `0..term_count`)
    pub term_count: u64,

    /// Fractional digits written to the wire
    pub transport_digits: u64,

    /// Bytes provisioned for one serialized partial sum
    pub wire_capacity: usize,
}

impl PrecisionPlan {
    /// Plan a run.
    ///
    /// - `working_bits = floor(digits × bits_per_digit) + guard_bits`
    /// - `term_count = digits + extra_terms`
    /// - `transport_digits = digits + transport_margin`
    /// - `wire_capacity = transport_digits + wire_overhead`
    pub fn new(digits: DigitRequest, margins: &PrecisionMargins) -> Self {
        let digits = digits.get();

        let digit_bits = Decimal::from(digits)
            .checked_mul(margins.bits_per_digit)
            .and_then(|bits| bits.floor().to_u64())
            .unwrap_or(u64::MAX);
        let working_bits = digit_bits.saturating_add(margins.guard_bits);
        let term_count = digits.saturating_add(margins.extra_terms);
        let transport_digits = digits.saturating_add(margins.transport_margin);
        let wire_capacity = usize::try_from(transport_digits.saturating_add(margins.wire_overhead))
            .unwrap_or(usize::MAX);

        Self {
            digits,
            working_bits,
            term_count,
            transport_digits,
            wire_capacity,
        }
    }

    /// Plan a run with standard margins.
    pub fn for_digits(digits: DigitRequest) -> Self {
        Self::new(digits, &PrecisionMargins::standard())
    }
}
