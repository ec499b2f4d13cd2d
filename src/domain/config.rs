// ============================================================================
// Computation Configuration
// Tunable precision margins and the complete run configuration
// ============================================================================

use crate::domain::plan::PrecisionPlan;
use crate::domain::request::DigitRequest;
use crate::errors::ComputeError;
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// log2(10): bits of information in one decimal digit.
pub const LOG2_10: Decimal = Decimal::from_parts(2_426_849_687, 7_734_466, 0, false, 16);

/// Sign, integer digit, radix point and terminator of a wire frame.
pub const MIN_WIRE_OVERHEAD: u64 = 4;

// ============================================================================
// Precision Margins
// ============================================================================

/// Empirical safety margins that turn a digit count into a precision plan.
///
/// None of these constants is derived from a proof; they are tunable so the
/// sufficiency of a margin set can be checked per target precision range.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecisionMargins {
    /// Working bits per requested digit; must exceed log2(10)
    pub bits_per_digit: Decimal,

    /// Extra working bits absorbing accumulated rounding error
    pub guard_bits: u64,

    /// Series terms beyond the digit count
    pub extra_terms: u64,

    /// Fractional digits serialized beyond the digit count
    pub transport_margin: u64,

    /// Frame bytes beyond the serialized fractional digits
    /// (sign, integer part, radix point, terminator)
    pub wire_overhead: u64,
}

impl PrecisionMargins {
    /// digits × 3.5 + 64 bits, digits + 10 terms, digits + 20 on the wire,
    /// frames of digits + 100 bytes.
    pub fn standard() -> Self {
        Self {
            bits_per_digit: Decimal::new(35, 1),
            guard_bits: 64,
            extra_terms: 10,
            transport_margin: 20,
            wire_overhead: 80,
        }
    }

    /// Roughly doubled margins for validating the standard set.
    pub fn conservative() -> Self {
        Self {
            bits_per_digit: Decimal::new(4, 0),
            guard_bits: 128,
            extra_terms: 20,
            transport_margin: 40,
            wire_overhead: 80,
        }
    }

    /// Builder method: Set bits per digit
    pub fn with_bits_per_digit(mut self, bits_per_digit: Decimal) -> Self {
        self.bits_per_digit = bits_per_digit;
        self
    }

    /// Builder method: Set guard bits
    pub fn with_guard_bits(mut self, guard_bits: u64) -> Self {
        self.guard_bits = guard_bits;
        self
    }

    /// Builder method: Set extra series terms
    pub fn with_extra_terms(mut self, extra_terms: u64) -> Self {
        self.extra_terms = extra_terms;
        self
    }

    /// Builder method: Set serialized digit margin
    pub fn with_transport_margin(mut self, transport_margin: u64) -> Self {
        self.transport_margin = transport_margin;
        self
    }

    /// Builder method: Set frame overhead
    pub fn with_wire_overhead(mut self, wire_overhead: u64) -> Self {
        self.wire_overhead = wire_overhead;
        self
    }

    /// Validate the margins
    pub fn validate(&self) -> Result<(), String> {
        if self.bits_per_digit <= LOG2_10 {
            return Err(format!(
                "Bits per digit must exceed log2(10) = {}",
                LOG2_10
            ));
        }

        if self.wire_overhead < MIN_WIRE_OVERHEAD {
            return Err(format!(
                "Wire overhead must be at least {} bytes",
                MIN_WIRE_OVERHEAD
            ));
        }

        Ok(())
    }
}

impl Default for PrecisionMargins {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Complete Computation Configuration
// ============================================================================

/// Everything every process needs to derive an identical precision plan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComputeConfig {
    /// Fractional digits to compute
    pub digits: DigitRequest,

    /// Precision margins
    pub margins: PrecisionMargins,
}

impl ComputeConfig {
    /// Create a configuration with standard margins
    pub fn new(digits: DigitRequest) -> Self {
        Self {
            digits,
            margins: PrecisionMargins::standard(),
        }
    }

    /// Create from a raw, unvalidated digit count
    pub fn from_raw_digits(digits: i64) -> Result<Self, ComputeError> {
        Ok(Self::new(DigitRequest::new(digits)?))
    }

    /// Builder method: Set precision margins
    pub fn with_margins(mut self, margins: PrecisionMargins) -> Self {
        self.margins = margins;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ComputeError> {
        self.margins.validate().map_err(ComputeError::InvalidConfig)
    }

    /// Derive the precision plan
    pub fn plan(&self) -> PrecisionPlan {
        PrecisionPlan::new(self.digits, &self.margins)
    }
}
