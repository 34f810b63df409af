//! Graph node trait: one step in a StateGraph.
//!
//! Receives the current [`State`] and returns a partial [`StateUpdate`] plus an optional goto
//! directive ([`Next`]). Nodes never persist anything themselves; the run loop applies the
//! update and writes the checkpoint.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::state::{State, StateUpdate};

use super::{Next, NodeContext};

/// What a node hands back to the run loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeOutput {
    /// Field writes, merged through the schema's reducers.
    pub update: StateUpdate,
    /// Optional goto directive; `Next::Continue` means "follow the edges".
    pub next: Next,
}

impl NodeOutput {
    /// Update only; routing follows the declared edges.
    pub fn update(update: StateUpdate) -> Self {
        Self {
            update,
            next: Next::Continue,
        }
    }

    /// Update plus a goto directive.
    pub fn goto(update: StateUpdate, next: Next) -> Self {
        Self { update, next }
    }
}

impl From<StateUpdate> for NodeOutput {
    fn from(update: StateUpdate) -> Self {
        NodeOutput::update(update)
    }
}

/// One step in a graph: state in, (update, next) out.
///
/// Called with a snapshot of the run's state; the node must not rely on running exactly
/// once. After a resume the interrupted node is re-entered from the beginning, so work done
/// before [`NodeContext::interrupt`] replays.
///
/// **Interaction**: Registered with [`StateGraph::add_node`](super::StateGraph::add_node);
/// invoked by the run loop of [`CompiledStateGraph`](super::CompiledStateGraph).
#[async_trait]
pub trait Node: Send + Sync {
    async fn run(&self, state: State, ctx: NodeContext) -> Result<NodeOutput, NodeError>;
}

type NodeFn =
    dyn Fn(&State, &NodeContext) -> Result<NodeOutput, NodeError> + Send + Sync + 'static;

/// Adapter turning a synchronous closure into a [`Node`].
///
/// ```rust
/// use stategraph::{FnNode, NodeOutput, StateUpdate};
///
/// let node = FnNode::new(|state, _ctx| {
///     let topic = state.get_str("topic").unwrap_or_default().to_string();
///     Ok(NodeOutput::update(
///         StateUpdate::new().set("details", format!("about to handle {}", topic)),
///     ))
/// });
/// # let _ = node;
/// ```
pub struct FnNode {
    f: Box<NodeFn>,
}

impl FnNode {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&State, &NodeContext) -> Result<NodeOutput, NodeError> + Send + Sync + 'static,
    {
        Self { f: Box::new(f) }
    }
}

#[async_trait]
impl Node for FnNode {
    async fn run(&self, state: State, ctx: NodeContext) -> Result<NodeOutput, NodeError> {
        (self.f)(&state, &ctx)
    }
}

/// Boxed future of one node invocation, as handed to middleware.
pub type NodeFuture = Pin<Box<dyn Future<Output = Result<NodeOutput, NodeError>> + Send>>;

/// The wrapped node call passed to [`NodeMiddleware::around_run`](super::NodeMiddleware::around_run).
pub type NodeCall = Box<dyn FnOnce(State, NodeContext) -> NodeFuture + Send>;
