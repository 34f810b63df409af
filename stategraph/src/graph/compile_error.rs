//! Graph compilation error and warnings.
//!
//! Returned by `StateGraph::add_node` (duplicate/reserved ids) and `StateGraph::compile`
//! (structural problems). A compiled graph never produces these.

use std::fmt;

use thiserror::Error;

/// Fatal problem found while building or compiling a state graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    /// `add_node` was called twice with the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),

    /// A node was registered under the reserved START or END id.
    #[error("node id is reserved: {0}")]
    ReservedNodeId(String),

    /// START has no outgoing edge.
    #[error("graph must have an edge from START")]
    MissingStart,

    /// No path leads from START to END.
    #[error("END is not reachable from START")]
    EndUnreachable,

    /// An edge (or declared goto destination) names a node that was never added.
    #[error("edge `{edge}` references unknown node `{node}`")]
    NodeNotFound { node: String, edge: String },

    /// Edge leaving END or entering START.
    #[error("invalid edge `{0}`: END has no successors and START no predecessors")]
    InvalidEdge(String),

    /// More than one unconditional edge, or more than one conditional edge set, from a node.
    #[error("node `{from}` declares more than one {kind} edge")]
    DuplicateEdge { from: String, kind: &'static str },

    /// A conditional edge was declared with an empty label map.
    #[error("conditional edge from `{0}` has no labels")]
    EmptyPathMap(String),

    /// Strict compilation found nodes that can never run.
    #[error("unreachable nodes: {0:?}")]
    Unreachable(Vec<String>),
}

/// Non-fatal finding reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileWarning {
    /// The node cannot be reached from START.
    UnreachableNode(String),
    /// The node has an unconditional edge, so its conditional edge is never taken.
    ShadowedConditionalEdge(String),
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileWarning::UnreachableNode(id) => {
                write!(f, "node `{}` is unreachable from START", id)
            }
            CompileWarning::ShadowedConditionalEdge(id) => write!(
                f,
                "node `{}` has an unconditional edge; its conditional edge is never taken",
                id
            ),
        }
    }
}
