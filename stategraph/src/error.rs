//! Node and run error types.
//!
//! [`NodeError`] is returned by node logic (and carries interrupts); [`RunError`] is what a run
//! reports to its caller. Build-time problems live in
//! [`CompilationError`](crate::graph::CompilationError).

use serde_json::Value;
use thiserror::Error;

use crate::memory::{CheckpointError, RunStatus};
use crate::state::StateError;
use crate::tools::ToolError;

/// Error returned by a node's own logic.
///
/// `Interrupted` is not a failure: it is produced by
/// [`NodeContext::interrupt`](crate::graph::NodeContext::interrupt) and propagated with `?` so
/// the executor can suspend the run. Every other variant fails the run as
/// [`RunError::NodeExecution`].
#[derive(Debug, Clone, Error)]
pub enum NodeError {
    /// Execution failed with a message (e.g. bad input, external call failed).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A tool call failed, including dispatch to an unknown tool name.
    #[error("tool: {0}")]
    Tool(#[from] ToolError),

    /// The language-model client failed.
    #[error("llm: {0}")]
    Llm(String),

    /// The node could not read the state it expected.
    #[error("state: {0}")]
    State(#[from] StateError),

    /// The node asked the caller for input; carries the payload handed to the caller.
    #[error("interrupted: {0}")]
    Interrupted(Value),
}

/// Error reported by a run (start, resume, or a step inside the run loop).
///
/// Errors that terminate a run (`NodeExecution`, `UnroutableLabel`, `DeadEndNode`, `Schema`,
/// `UnknownNodeId`, `RecursionLimit`) are returned inside
/// [`RunOutcome::Failed`](crate::graph::RunOutcome::Failed) after the failed record is
/// persisted. The remaining variants are returned as `Err` because no run step happened.
#[derive(Debug, Clone, Error)]
pub enum RunError {
    /// A goto directive or edge named a node that is not registered.
    #[error("unknown node id: {0}")]
    UnknownNodeId(String),

    /// A node's logic failed; the original cause is kept.
    #[error("node `{node_id}` failed: {cause}")]
    NodeExecution { node_id: String, cause: NodeError },

    /// A router returned a label missing from its path map.
    #[error("node `{node_id}`: router returned unmapped label `{label}`")]
    UnroutableLabel { node_id: String, label: String },

    /// A node has no outgoing edge and did not return a goto directive.
    #[error("node `{0}` has no outgoing edge and returned no goto")]
    DeadEndNode(String),

    /// A node (or the run input) wrote a field the schema does not declare.
    #[error("update from `{node_id}` rejected: {source}")]
    Schema {
        node_id: String,
        #[source]
        source: StateError,
    },

    /// The invocation ran more node steps than `RunnableConfig::recursion_limit`.
    #[error("recursion limit of {0} steps reached without hitting END")]
    RecursionLimit(usize),

    /// No record exists for the run id.
    #[error("run not found: {0}")]
    RunNotFound(String),

    /// `resume` was called for a run that is not waiting on an interrupt.
    #[error("run `{run_id}` is not suspended (status: {status})")]
    NotSuspended { run_id: String, status: RunStatus },

    /// `start` was called with the id of a run that is waiting on an interrupt.
    #[error("run `{0}` is suspended; resume it instead of starting over")]
    RunSuspended(String),

    /// `start` was called with the id of a run whose last checkpoint is mid-flight.
    #[error("run `{0}` has a mid-flight checkpoint; continue it instead of starting over")]
    RunInFlight(String),

    /// `continue_run` was called for a run whose last checkpoint is not mid-flight.
    #[error("run `{run_id}` cannot be continued (status: {status})")]
    NotInFlight { run_id: String, status: RunStatus },

    /// Another task is currently driving the same run id.
    #[error("run `{0}` is already being driven")]
    RunBusy(String),

    /// `resume_with_config` was called without `thread_id`.
    #[error("thread_id required")]
    ThreadIdRequired,

    /// The checkpoint backend failed.
    #[error("checkpoint: {0}")]
    Checkpoint(#[from] CheckpointError),
}
