// ============================================================================
// Wire Codec
// Precision-preserving text frames for big fixed-point values
// ============================================================================
//
// Frame layout (one per worker-to-coordinator message, no other framing):
//
//     [-]<integer digits>.<transport_digits fractional digits>\0
//
// Serialization truncates at `digits + transport_margin` fractional digits,
// so the round trip loses less than one unit in the last requested digit.

use crate::domain::PrecisionPlan;
use crate::errors::{ComputeError, ComputeResult};
use crate::numeric::{BigFixed, NumericError};
use crate::transport::errors::TransportError;

/// Sentinel byte closing every frame.
pub const FRAME_TERMINATOR: u8 = 0;

/// Bytes to provision for one frame under `plan`.
#[inline]
pub fn wire_capacity(plan: &PrecisionPlan) -> usize {
    plan.wire_capacity
}

/// Encode a partial sum as a NUL-terminated decimal frame.
///
/// # Errors
/// - `PayloadTooLarge` if the frame would exceed the wire capacity
/// - `Numeric(Overflow)` if the digit count exceeds the machine range
pub fn serialize(value: &BigFixed, plan: &PrecisionPlan) -> ComputeResult<Vec<u8>> {
    let frac_digits = usize::try_from(plan.transport_digits).map_err(|_| NumericError::Overflow)?;
    let text = value.to_decimal_string(frac_digits)?;

    let len = text.len() + 1;
    let capacity = wire_capacity(plan);
    if len > capacity {
        return Err(TransportError::PayloadTooLarge { len, capacity }.into());
    }

    let mut frame = Vec::with_capacity(len);
    frame.extend_from_slice(text.as_bytes());
    frame.push(FRAME_TERMINATOR);
    Ok(frame)
}

/// Decode a frame produced by [`serialize`] at `working_bits` precision.
///
/// # Errors
/// - `MissingTerminator` if the frame does not end in NUL
/// - `InvalidEncoding` for anything but one decimal record
pub fn deserialize(frame: &[u8], working_bits: u64) -> ComputeResult<BigFixed> {
    let end = frame
        .iter()
        .position(|b| *b == FRAME_TERMINATOR)
        .ok_or(TransportError::MissingTerminator)?;
    if end + 1 != frame.len() {
        return Err(TransportError::InvalidEncoding.into());
    }

    let text = std::str::from_utf8(&frame[..end]).map_err(|_| TransportError::InvalidEncoding)?;
    BigFixed::parse_decimal(text, working_bits).map_err(|err| match err {
        NumericError::InvalidInput => ComputeError::Transport(TransportError::InvalidEncoding),
        other => ComputeError::Numeric(other),
    })
}
