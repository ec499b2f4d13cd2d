// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod communicator;
mod event_handler;

pub use communicator::Communicator;
pub use event_handler::{ComputeEvent, EventHandler, LoggingEventHandler, NoOpEventHandler};
