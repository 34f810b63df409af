//! Node registry: node id to node, with declared goto destinations.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{NodeError, RunError};
use crate::state::State;

use super::node::{NodeCall, NodeFuture, NodeOutput};
use super::{CompilationError, Node, NodeContext, NodeMiddleware, END, START};

#[derive(Clone)]
struct NodeEntry {
    node: Arc<dyn Node>,
    /// Nodes this node may name in a goto directive; used only for validation.
    destinations: Vec<String>,
}

/// Result of invoking one node.
#[derive(Debug)]
pub(crate) enum Invocation {
    Completed(NodeOutput),
    Interrupted(serde_json::Value),
}

/// Registered nodes of a graph. Frozen once the graph is compiled.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, NodeEntry>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node` under `id`. Ids must be unique and must not be START/END.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        node: Arc<dyn Node>,
        destinations: Vec<String>,
    ) -> Result<(), CompilationError> {
        let id = id.into();
        if id == START || id == END {
            return Err(CompilationError::ReservedNodeId(id));
        }
        if self.nodes.contains_key(&id) {
            return Err(CompilationError::DuplicateNodeId(id));
        }
        self.nodes.insert(id, NodeEntry { node, destinations });
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Declared goto destinations of `id` (empty when none were declared).
    pub fn destinations(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|e| e.destinations.as_slice())
            .unwrap_or(&[])
    }

    /// Runs node `id`, through `middleware` when present.
    ///
    /// Unregistered ids fail with `UnknownNodeId`; node failures come back as
    /// `NodeExecution { node_id, cause }`; an interrupt is not an error here.
    pub(crate) async fn invoke(
        &self,
        id: &str,
        state: State,
        ctx: NodeContext,
        middleware: Option<&Arc<dyn NodeMiddleware>>,
    ) -> Result<Invocation, RunError> {
        let node = self
            .nodes
            .get(id)
            .map(|e| e.node.clone())
            .ok_or_else(|| RunError::UnknownNodeId(id.to_string()))?;

        let result = match middleware {
            Some(mw) => {
                let inner: NodeCall = Box::new(move |s: State, c: NodeContext| -> NodeFuture {
                    Box::pin(async move { node.run(s, c).await })
                });
                mw.around_run(id, state, ctx, inner).await
            }
            None => node.run(state, ctx).await,
        };

        match result {
            Ok(output) => Ok(Invocation::Completed(output)),
            Err(NodeError::Interrupted(payload)) => Ok(Invocation::Interrupted(payload)),
            Err(cause) => Err(RunError::NodeExecution {
                node_id: id.to_string(),
                cause,
            }),
        }
    }
}
