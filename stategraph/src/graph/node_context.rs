//! Per-invocation context passed into nodes.
//!
//! Carries the run id, node id, step counter and the interrupt primitive. A fresh context is
//! built for every node invocation, so nothing leaks between runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::error::NodeError;
use crate::memory::RunnableConfig;

/// Context handed to [`Node::run`](super::Node::run).
#[derive(Debug)]
pub struct NodeContext {
    run_id: String,
    node_id: String,
    step: u64,
    config: RunnableConfig,
    /// Resume values supplied by the caller for this node, in interrupt order.
    resume_values: Vec<Value>,
    /// Number of `interrupt` calls made so far in this invocation.
    interrupts_seen: AtomicUsize,
}

impl NodeContext {
    pub(crate) fn new(
        run_id: impl Into<String>,
        node_id: impl Into<String>,
        step: u64,
        config: RunnableConfig,
        resume_values: Vec<Value>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            node_id: node_id.into(),
            step,
            config,
            resume_values,
            interrupts_seen: AtomicUsize::new(0),
        }
    }

    /// Suspends the run and hands `payload` to the caller, or returns the caller's answer.
    ///
    /// The n-th call inside one invocation returns the n-th resume value supplied for this
    /// node. When no such value exists yet the call yields [`NodeError::Interrupted`]; the
    /// node propagates it with `?` and the run is checkpointed as suspended. On resume the
    /// node runs again from the beginning and this call returns the resume value.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use stategraph::{FnNode, Next, NodeOutput, StateUpdate};
    ///
    /// let approve = FnNode::new(|_state, ctx| {
    ///     let answer = ctx.interrupt(json!({"question": "approve?"}))?;
    ///     let next = if answer["decision"] == "yes" { "yes_node" } else { "no_node" };
    ///     Ok(NodeOutput::goto(StateUpdate::new(), Next::node(next)))
    /// });
    /// # let _ = approve;
    /// ```
    pub fn interrupt(&self, payload: impl Into<Value>) -> Result<Value, NodeError> {
        let index = self.interrupts_seen.fetch_add(1, Ordering::SeqCst);
        match self.resume_values.get(index) {
            Some(value) => Ok(value.clone()),
            None => Err(NodeError::Interrupted(payload.into())),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Number of nodes completed in this run before this invocation.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn config(&self) -> &RunnableConfig {
        &self.config
    }

    /// True when this invocation is the re-entry of an interrupted node.
    pub fn is_resuming(&self) -> bool {
        !self.resume_values.is_empty()
    }
}
