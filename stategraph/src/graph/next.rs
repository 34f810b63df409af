//! Goto directive a node may return alongside its state update.
//!
//! The run loop consults it after a node completes. An unconditional edge out of the node
//! always wins; otherwise the directive wins over conditional routing.

use std::fmt;

/// Next step requested by a node.
///
/// - **Continue**: no directive; follow the node's declared edges.
/// - **Node(id)**: go to the given node (unless an unconditional edge is declared).
/// - **End**: finish the run (unless an unconditional edge is declared).
///
/// **Interaction**: Returned in [`NodeOutput`](super::NodeOutput); consumed by the routing
/// step of [`CompiledStateGraph`](super::CompiledStateGraph).
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum Next {
    #[default]
    Continue,
    Node(String),
    End,
}

impl Next {
    /// Directive to jump to `id`.
    pub fn node(id: impl Into<String>) -> Self {
        Next::Node(id.into())
    }

    /// True when the node returned an explicit directive.
    pub fn is_directive(&self) -> bool {
        !matches!(self, Next::Continue)
    }
}

impl fmt::Display for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Next::Continue => write!(f, "continue"),
            Next::Node(id) => write!(f, "goto {}", id),
            Next::End => write!(f, "end"),
        }
    }
}
