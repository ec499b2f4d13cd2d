// ============================================================================
// Process State Machine
// INIT → PLAN → PARTITION → LOCAL_SUM → (RECEIVE_ALL → AGGREGATE → RENDER)
//                                     | (SEND → DONE)
// ============================================================================

use crate::errors::ComputeError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProcessState {
    Init = 0,
    Plan = 1,
    Partition = 2,
    LocalSum = 3,
    ReceiveAll = 4,
    Aggregate = 5,
    Render = 6,
    Send = 7,
    Done = 8,
}

/// Valid transitions for the per-process state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProcessTransition {
    Plan,
    Partition,
    Accumulate,
    BeginReceive,
    Aggregate,
    Render,
    Send,
    Finish,
}

impl ProcessState {
    /// `Render` ends the coordinator, `Done` ends every other worker.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessState::Render | ProcessState::Done)
    }

    pub fn transition(&self, transition: ProcessTransition) -> Result<ProcessState, ComputeError> {
        match (self, transition) {
            (ProcessState::Init, ProcessTransition::Plan) => Ok(ProcessState::Plan),
            (ProcessState::Plan, ProcessTransition::Partition) => Ok(ProcessState::Partition),
            (ProcessState::Partition, ProcessTransition::Accumulate) => Ok(ProcessState::LocalSum),

            // Coordinator branch
            (ProcessState::LocalSum, ProcessTransition::BeginReceive) => {
                Ok(ProcessState::ReceiveAll)
            },
            (ProcessState::ReceiveAll, ProcessTransition::Aggregate) => Ok(ProcessState::Aggregate),
            (ProcessState::Aggregate, ProcessTransition::Render) => Ok(ProcessState::Render),

            // Worker branch
            (ProcessState::LocalSum, ProcessTransition::Send) => Ok(ProcessState::Send),
            (ProcessState::Send, ProcessTransition::Finish) => Ok(ProcessState::Done),

            _ => Err(ComputeError::InvalidTransition {
                from: *self,
                via: transition,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinator_path() {
        let path = [
            ProcessTransition::Plan,
            ProcessTransition::Partition,
            ProcessTransition::Accumulate,
            ProcessTransition::BeginReceive,
            ProcessTransition::Aggregate,
            ProcessTransition::Render,
        ];
        let end = path
            .iter()
            .try_fold(ProcessState::Init, |state, t| state.transition(*t))
            .unwrap();
        assert_eq!(end, ProcessState::Render);
        assert!(end.is_terminal());
    }

    #[test]
    fn test_worker_path() {
        let path = [
            ProcessTransition::Plan,
            ProcessTransition::Partition,
            ProcessTransition::Accumulate,
            ProcessTransition::Send,
            ProcessTransition::Finish,
        ];
        let end = path
            .iter()
            .try_fold(ProcessState::Init, |state, t| state.transition(*t))
            .unwrap();
        assert_eq!(end, ProcessState::Done);
        assert!(end.is_terminal());
    }

    #[test]
    fn test_cannot_skip_local_sum() {
        let result = ProcessState::Partition.transition(ProcessTransition::Send);
        assert_eq!(
            result,
            Err(ComputeError::InvalidTransition {
                from: ProcessState::Partition,
                via: ProcessTransition::Send,
            })
        );
        assert!(ProcessState::Plan
            .transition(ProcessTransition::Aggregate)
            .is_err());
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        assert!(ProcessState::Render
            .transition(ProcessTransition::Finish)
            .is_err());
        assert!(ProcessState::Done.transition(ProcessTransition::Send).is_err());
    }
}
