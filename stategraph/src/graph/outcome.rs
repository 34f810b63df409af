//! What `start` and `resume` hand back to the caller.

use crate::error::RunError;
use crate::memory::{Interrupt, RunStatus};
use crate::state::State;

/// Result of driving a run until it stops.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The run reached END; carries the final state.
    Completed(State),
    /// A node interrupted; resume with the run id and the caller's answer.
    Suspended(Interrupt),
    /// The run failed; the failed record is already persisted.
    Failed(RunError),
}

impl RunOutcome {
    /// Record status matching this outcome.
    pub fn status(&self) -> RunStatus {
        match self {
            RunOutcome::Completed(_) => RunStatus::Completed,
            RunOutcome::Suspended(_) => RunStatus::Suspended,
            RunOutcome::Failed(_) => RunStatus::Failed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    /// Final state when completed.
    pub fn state(&self) -> Option<&State> {
        match self {
            RunOutcome::Completed(state) => Some(state),
            _ => None,
        }
    }

    pub fn interrupt(&self) -> Option<&Interrupt> {
        match self {
            RunOutcome::Suspended(interrupt) => Some(interrupt),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RunError> {
        match self {
            RunOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Outcome of `start`, together with the id needed to resume or re-fetch the run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub run_id: String,
    pub outcome: RunOutcome,
}
