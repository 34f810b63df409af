//! Logging helpers for graph compilation and run execution.
//!
//! Structured `tracing` events with `run_id` / `node_id` fields, so a subscriber can filter
//! one run out of many concurrent ones.

use crate::error::RunError;

use super::{CompileWarning, Next};

/// Log node execution start.
pub fn log_node_start(run_id: &str, node_id: &str) {
    tracing::debug!(run_id, node_id, "Starting node execution");
}

/// Log node execution completion with the directive it returned.
pub fn log_node_complete(run_id: &str, node_id: &str, next: &Next) {
    tracing::debug!(run_id, node_id, %next, "Node execution complete");
}

/// Log the fields a node's update touched.
pub fn log_state_update(run_id: &str, node_id: &str, fields: usize) {
    tracing::trace!(run_id, node_id, fields, "State updated");
}

/// Log the routing decision taken after a node.
pub fn log_route(run_id: &str, from: &str, to: &str) {
    tracing::debug!(run_id, from, to, "Routed");
}

/// Log run start (fresh start or resume).
pub fn log_run_start(run_id: &str, resumed: bool) {
    tracing::info!(run_id, resumed, "Starting graph run");
}

/// Log a run suspending on an interrupt.
pub fn log_run_suspended(run_id: &str, node_id: &str) {
    tracing::info!(run_id, node_id, "Graph run suspended on interrupt");
}

/// Log run completion.
pub fn log_run_complete(run_id: &str, steps: u64) {
    tracing::info!(run_id, steps, "Graph run complete");
}

/// Log a run failure.
pub fn log_run_error(run_id: &str, error: &RunError) {
    tracing::error!(run_id, %error, "Graph run failed");
}

/// Log a non-fatal validator finding.
pub fn log_compile_warning(warning: &CompileWarning) {
    tracing::warn!(%warning, "Graph compiled with warning");
}
