// ============================================================================
// Domain Models Module
// Contains the digit request, worker identity, precision planning and the
// per-process state machine
// ============================================================================

pub mod config;
pub mod identity;
pub mod plan;
pub mod request;
pub mod state;

pub use config::{ComputeConfig, PrecisionMargins};
pub use identity::{WorkerIdentity, COORDINATOR_RANK};
pub use plan::PrecisionPlan;
pub use request::{DigitRequest, DEFAULT_DIGITS};

// Re-export state machine
pub use state::{ProcessState, ProcessTransition};
