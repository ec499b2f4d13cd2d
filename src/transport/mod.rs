// ============================================================================
// Transport Module
// Moves partial sums between workers that share no memory
// ============================================================================
//
// This module provides:
// - codec: NUL-terminated base-10 frames with a precision margin
// - channel: in-process group, one thread per worker
// - pipe: multi-process group, one OS process per worker

pub mod codec;

mod channel;
mod errors;
mod pipe;

pub use channel::{ChannelCommunicator, ChannelGroup};
pub use codec::{deserialize, serialize, wire_capacity, FRAME_TERMINATOR};
pub use errors::TransportError;
pub use pipe::{PipeCommunicator, RANK_ENV, SIZE_ENV};
