// ============================================================================
// Event Handler Interface
// Defines the contract for observing a computation's progress
// ============================================================================

use crate::domain::PrecisionPlan;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by workers
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComputeEvent {
    /// Precision plan derived
    PlanComputed {
        rank: usize,
        plan: PrecisionPlan,
        timestamp: DateTime<Utc>,
    },

    /// Local partial sum finished
    LocalSumComputed {
        rank: usize,
        terms_summed: usize,
        /// Leading digits of the partial sum, for logs only
        approximation: Option<Decimal>,
        timestamp: DateTime<Utc>,
    },

    /// Partial sum handed to the transport
    PartialSumSent {
        rank: usize,
        bytes: usize,
        timestamp: DateTime<Utc>,
    },

    /// Partial sum received by the coordinator
    PartialSumReceived {
        source: usize,
        bytes: usize,
        timestamp: DateTime<Utc>,
    },

    /// All partial sums folded into the final value
    Aggregated {
        contributions: usize,
        approximation: Option<Decimal>,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing worker events
/// Implementations can handle logging, metrics, progress display, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a compute event
    fn on_event(&self, event: ComputeEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<ComputeEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: ComputeEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: ComputeEvent) {
        tracing::debug!("Compute event: {:?}", event);
    }
}
