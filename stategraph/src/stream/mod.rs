//! Streaming types for graph runs.
//!
//! `CompiledStateGraph::stream` drives a run on a spawned task and reports progress through a
//! channel-backed stream. Per-node events are filtered by [`StreamMode`]; the final event
//! (`Interrupt`, `Completed` or `Failed`) is always sent and closes the stream.

use std::collections::HashSet;

use tokio::sync::mpsc;

use crate::error::RunError;
use crate::memory::Interrupt;
use crate::state::{State, StateUpdate};

/// Stream mode selector: which per-node events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit full state after each node completes.
    Values,
    /// Emit the node id and the partial update it returned.
    Updates,
}

/// Event emitted while running a graph.
#[derive(Clone, Debug)]
pub enum StreamEvent {
    /// Full state snapshot after a node's update was applied.
    Values(State),
    /// Partial update returned by a node, before merging.
    Updates { node_id: String, update: StateUpdate },
    /// The run suspended; resume it with `CompiledStateGraph::resume`.
    Interrupt(Interrupt),
    /// The run reached END.
    Completed(State),
    /// The run failed, or could not be started or resumed.
    Failed(RunError),
}

impl StreamEvent {
    /// True for the event that ends a stream.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            StreamEvent::Interrupt(_) | StreamEvent::Completed(_) | StreamEvent::Failed(_)
        )
    }
}

/// Sending half used by the run loop. A dropped receiver is not an error; the run continues.
pub(crate) struct StreamSink {
    tx: mpsc::Sender<StreamEvent>,
    modes: HashSet<StreamMode>,
}

impl StreamSink {
    pub(crate) fn new(tx: mpsc::Sender<StreamEvent>, modes: HashSet<StreamMode>) -> Self {
        Self { tx, modes }
    }

    pub(crate) async fn node_finished(&self, node_id: &str, update: &StateUpdate, state: &State) {
        if self.modes.contains(&StreamMode::Updates) {
            self.emit(StreamEvent::Updates {
                node_id: node_id.to_string(),
                update: update.clone(),
            })
            .await;
        }
        if self.modes.contains(&StreamMode::Values) {
            self.emit(StreamEvent::Values(state.clone())).await;
        }
    }

    pub(crate) async fn emit(&self, event: StreamEvent) {
        let _ = self.tx.send(event).await;
    }
}
