//! Run record: the unit the checkpointer persists.
//!
//! One record per run id, overwritten after every node and on every interrupt, retained
//! after the run finishes so results can be re-fetched.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::State;

/// Lifecycle of a run.
///
/// `Ready -> Running -> {Suspended, Completed, Failed}`; `Suspended -> Running` on resume.
/// `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Ready,
    Running,
    Suspended,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Ready => "ready",
            RunStatus::Running => "running",
            RunStatus::Suspended => "suspended",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Payload a node handed to the caller when it suspended the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interrupt {
    /// Node that called `NodeContext::interrupt` and will be re-entered on resume.
    pub node_id: String,
    pub payload: Value,
}

/// Durable snapshot of a run: state plus position.
///
/// `pending_node` is the node to run next (the interrupted node while suspended); `None` once
/// the run reached END. Written only by the run loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub status: RunStatus,
    pub state: State,
    pub pending_node: Option<String>,
    pub interrupt: Option<Interrupt>,
    /// Resume values collected for the pending node, in interrupt order.
    #[serde(default)]
    pub resume_values: Vec<Value>,
    /// Number of nodes completed so far.
    pub step: u64,
    /// Error text when `status` is `Failed`.
    pub error: Option<String>,
    /// Milliseconds since the Unix epoch of the last write.
    pub updated_at_ms: u64,
}

impl RunRecord {
    /// Creates the record of a run about to execute `pending_node`.
    pub fn new(run_id: impl Into<String>, state: State, pending_node: Option<String>) -> Self {
        Self {
            run_id: run_id.into(),
            status: RunStatus::Ready,
            state,
            pending_node,
            interrupt: None,
            resume_values: Vec::new(),
            step: 0,
            error: None,
            updated_at_ms: now_ms(),
        }
    }

    /// Refreshes `updated_at_ms`; called before every save.
    pub fn touch(&mut self) {
        self.updated_at_ms = now_ms();
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
