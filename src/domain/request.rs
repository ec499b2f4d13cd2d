// ============================================================================
// Digit Request
// ============================================================================

use crate::errors::ComputeError;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Digit count used when none is supplied.
pub const DEFAULT_DIGITS: u64 = 100;

/// A validated number of fractional decimal digits to compute (always ≥ 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "u64"))]
pub struct DigitRequest(u64);

impl DigitRequest {
    /// Validate a raw digit count.
    ///
    /// # Errors
    /// Returns `InvalidDigitCount` for anything below 1.
    pub fn new(requested: i64) -> Result<Self, ComputeError> {
        if requested < 1 {
            return Err(ComputeError::InvalidDigitCount(requested));
        }
        Ok(Self(requested.unsigned_abs()))
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for DigitRequest {
    fn default() -> Self {
        Self(DEFAULT_DIGITS)
    }
}

impl TryFrom<i64> for DigitRequest {
    type Error = ComputeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DigitRequest> for u64 {
    fn from(request: DigitRequest) -> Self {
        request.0
    }
}

impl fmt::Display for DigitRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
