// ============================================================================
// Numeric Module
// Arbitrary-precision fixed-point arithmetic for series evaluation
// ============================================================================
//
// This module provides:
// - BigFixed: signed binary fixed-point value of unbounded magnitude
// - NumericError: Error types for arithmetic operations
//
// Design principles:
// - No floating-point operations
// - Precision travels with every value, never through global state
// - All fallible arithmetic returns Result (no panics)
// - Floor rounding for every shift and division

mod big_fixed;
mod errors;

pub use big_fixed::BigFixed;
pub use errors::{NumericError, NumericResult};
