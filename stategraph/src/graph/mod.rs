//! State graph: nodes, routed edges, compile-time validation and the run loop.
//!
//! Build a [`StateGraph`] over a [`StateSchema`](crate::StateSchema), add nodes and edges,
//! compile it into a [`CompiledStateGraph`], then `start` / `resume` runs against it.

mod compile_error;
mod compiled;
mod edge;
pub mod logging;
mod next;
mod node;
mod node_context;
mod node_middleware;
mod outcome;
mod registry;
mod state_graph;
mod validate;

pub use compile_error::{CompilationError, CompileWarning};
pub use compiled::CompiledStateGraph;
pub use edge::{ConditionalEdge, EdgeTable, RouterFn};
pub use next::Next;
pub use node::{FnNode, Node, NodeCall, NodeFuture, NodeOutput};
pub use node_context::NodeContext;
pub use node_middleware::{LoggingMiddleware, NodeMiddleware};
pub use outcome::{RunOutcome, RunResult};
pub use registry::NodeRegistry;
pub use state_graph::{CompileOptions, StateGraph, END, START};
