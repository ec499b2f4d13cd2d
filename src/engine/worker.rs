// ============================================================================
// Worker
// Drives one process of the group from its rank to its terminal state
// ============================================================================

use crate::domain::{
    ComputeConfig, PrecisionPlan, ProcessState, ProcessTransition, WorkerIdentity,
    COORDINATOR_RANK,
};
use crate::engine::aggregator::Aggregator;
use crate::errors::{ComputeError, ComputeResult};
use crate::interfaces::{Communicator, ComputeEvent, EventHandler};
use crate::numeric::BigFixed;
use crate::series::{accumulate, owned_terms, PartialSum};
use crate::transport::{deserialize, serialize, wire_capacity};
use crate::utils::DigitRenderer;
use chrono::Utc;
use std::sync::Arc;

/// The aggregated sum, owned by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalResult {
    value: BigFixed,
    plan: PrecisionPlan,
    contributions: usize,
}

impl FinalResult {
    pub fn value(&self) -> &BigFixed {
        &self.value
    }

    pub fn plan(&self) -> &PrecisionPlan {
        &self.plan
    }

    /// Partial sums folded in, the coordinator's own included
    pub fn contributions(&self) -> usize {
        self.contributions
    }

    /// Exactly `plan.digits` fractional digits, ungrouped
    pub fn digits(&self) -> ComputeResult<String> {
        Ok(self.value.fractional_digits(self.requested_digits())?)
    }

    /// `3.` followed by the grouped fractional digits
    pub fn render(&self) -> ComputeResult<String> {
        self.render_with(&DigitRenderer::new())
    }

    pub fn render_with(&self, renderer: &DigitRenderer) -> ComputeResult<String> {
        Ok(renderer.render(&self.value, self.requested_digits())?)
    }

    pub fn into_value(self) -> BigFixed {
        self.value
    }

    fn requested_digits(&self) -> usize {
        usize::try_from(self.plan.digits).unwrap_or(usize::MAX)
    }
}

/// How a worker's run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Rank 0 reached `Render` holding the final sum
    Coordinator(FinalResult),
    /// Any other rank reached `Done` after sending its partial sum
    Done,
}

impl WorkerOutcome {
    pub fn into_result(self) -> Option<FinalResult> {
        match self {
            WorkerOutcome::Coordinator(result) => Some(result),
            WorkerOutcome::Done => None,
        }
    }
}

/// One member of the worker group.
///
/// Owns its communicator endpoint and its partial sum; nothing numeric is
/// shared with other workers.
pub struct Worker<C: Communicator> {
    identity: WorkerIdentity,
    config: ComputeConfig,
    communicator: C,
    event_handler: Arc<dyn EventHandler>,
    state: ProcessState,
}

impl<C: Communicator> Worker<C> {
    pub fn new(
        identity: WorkerIdentity,
        config: ComputeConfig,
        communicator: C,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            identity,
            config,
            communicator,
            event_handler,
            state: ProcessState::Init,
        }
    }

    pub fn identity(&self) -> WorkerIdentity {
        self.identity
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Release the communicator, e.g. to reap worker processes.
    pub fn into_communicator(self) -> C {
        self.communicator
    }

    /// Run from `Init` to the terminal state for this rank.
    ///
    /// # Errors
    /// Any failure is fatal for the whole group; a second call fails with
    /// `InvalidTransition`.
    pub fn run(&mut self) -> ComputeResult<WorkerOutcome> {
        if self.communicator.rank() != self.identity.rank()
            || self.communicator.size() != self.identity.group_size()
        {
            return Err(ComputeError::InvalidGroup {
                rank: self.communicator.rank(),
                group_size: self.communicator.size(),
            });
        }

        let rank = self.identity.rank();

        self.advance(ProcessTransition::Plan)?;
        let plan = self.config.plan();
        tracing::debug!(
            rank,
            working_bits = plan.working_bits,
            term_count = plan.term_count,
            "precision plan"
        );
        self.event_handler.on_event(ComputeEvent::PlanComputed {
            rank,
            plan,
            timestamp: Utc::now(),
        });

        self.advance(ProcessTransition::Partition)?;
        let terms = owned_terms(rank, self.identity.group_size(), plan.term_count);
        if terms.is_idle() {
            tracing::debug!(rank, "no terms owned, contributing zero");
        }

        self.advance(ProcessTransition::Accumulate)?;
        let partial = accumulate(terms, plan.working_bits)?;
        tracing::debug!(rank, terms = partial.terms_summed(), "local sum computed");
        self.event_handler.on_event(ComputeEvent::LocalSumComputed {
            rank,
            terms_summed: partial.terms_summed(),
            approximation: partial.value().to_decimal().ok(),
            timestamp: Utc::now(),
        });

        if self.identity.is_coordinator() {
            self.collect(partial, plan)
        } else {
            self.send(partial, plan)
        }
    }

    fn advance(&mut self, transition: ProcessTransition) -> ComputeResult<()> {
        self.state = self.state.transition(transition)?;
        Ok(())
    }

    /// Coordinator path: one blocking receive per contributor, in rank order.
    fn collect(&mut self, partial: PartialSum, plan: PrecisionPlan) -> ComputeResult<WorkerOutcome> {
        self.advance(ProcessTransition::BeginReceive)?;
        let capacity = wire_capacity(&plan);
        let mut aggregator = Aggregator::new(self.identity.group_size(), partial.into_value());

        for source in self.identity.contributors() {
            let frame = self.communicator.recv(source, capacity)?;
            let value = deserialize(&frame, plan.working_bits)?;
            tracing::debug!(source, bytes = frame.len(), "partial sum received");
            self.event_handler.on_event(ComputeEvent::PartialSumReceived {
                source,
                bytes: frame.len(),
                timestamp: Utc::now(),
            });
            aggregator.absorb(source, &value)?;
        }

        self.advance(ProcessTransition::Aggregate)?;
        let value = aggregator.finish()?;
        let contributions = self.identity.group_size();
        tracing::info!(contributions, digits = plan.digits, "partial sums aggregated");
        self.event_handler.on_event(ComputeEvent::Aggregated {
            contributions,
            approximation: value.to_decimal().ok(),
            timestamp: Utc::now(),
        });

        self.advance(ProcessTransition::Render)?;
        Ok(WorkerOutcome::Coordinator(FinalResult {
            value,
            plan,
            contributions,
        }))
    }

    /// Worker path: one send to the coordinator, then done.
    fn send(&mut self, partial: PartialSum, plan: PrecisionPlan) -> ComputeResult<WorkerOutcome> {
        self.advance(ProcessTransition::Send)?;
        let frame = serialize(partial.value(), &plan)?;
        self.communicator.send(COORDINATOR_RANK, &frame)?;
        tracing::debug!(rank = self.identity.rank(), bytes = frame.len(), "partial sum sent");
        self.event_handler.on_event(ComputeEvent::PartialSumSent {
            rank: self.identity.rank(),
            bytes: frame.len(),
            timestamp: Utc::now(),
        });

        self.advance(ProcessTransition::Finish)?;
        Ok(WorkerOutcome::Done)
    }
}
