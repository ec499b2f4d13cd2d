// ============================================================================
// Numeric Errors
// Error types for arbitrary-precision fixed-point arithmetic
// ============================================================================

use std::fmt;

/// Errors that can occur during big fixed-point arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// A machine-sized quantity (shift, exponent, denominator) exceeded its type
    Overflow,
    /// Attempted division by zero
    DivisionByZero,
    /// Input string or value is invalid
    InvalidInput,
    /// Operands carry different fractional precision
    ScaleMismatch,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Overflow => {
                write!(f, "arithmetic overflow: value exceeded machine range")
            },
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::InvalidInput => write!(f, "invalid input: could not parse value"),
            NumericError::ScaleMismatch => write!(f, "scale mismatch between operands"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
