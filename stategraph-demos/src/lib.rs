//! Demo graphs and process setup shared by the demo binaries.
//!
//! - `react_loop`: the `llm -> (tool | END)`, `tool -> llm` loop with a scripted model.
//! - `approval`: a human-approval step whose suspended runs live in SQLite, so `start` and
//!   `resume` can be separate process invocations.

mod config;
mod graphs;

use stategraph::RunOutcome;
use tracing::{info, warn};

pub use config::{DemoConfig, Error};
pub use graphs::{add_tool, approval_graph, react_loop_graph, APPROVAL_QUESTION};

/// Initializes tracing to stdout. Filter from `RUST_LOG`, default `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,stategraph=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Logs how a run ended: completed and suspended at `info`, failed at `warn`.
pub fn log_outcome(run_id: &str, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Completed(state) => {
            info!(run_id, state = %state.to_json(), "run completed")
        }
        RunOutcome::Suspended(interrupt) => info!(
            run_id,
            node_id = %interrupt.node_id,
            payload = %interrupt.payload,
            "run suspended"
        ),
        RunOutcome::Failed(e) => warn!(run_id, error = %e, "run failed"),
    }
}
