//! # stategraph
//!
//! A graph-based workflow engine for stateful, multi-step agent processes. Declare nodes,
//! connect them with unconditional and conditional edges, and let the engine drive a shared
//! state from [`START`] to [`END`], checkpointing after every node.
//!
//! ## Design Principles
//!
//! - **Schema-driven state**: each field of the [`State`] has a [`MergePolicy`]; nodes return
//!   partial [`StateUpdate`]s that the engine folds in (REPLACE overwrites, APPEND extends).
//! - **Validated structure**: [`StateGraph::compile`] rejects unknown node references and
//!   graphs where END cannot be reached, and warns about unreachable nodes.
//! - **Suspend and resume**: a node calls [`NodeContext::interrupt`] to hand a payload to the
//!   caller; the run is checkpointed and later resumed with the caller's answer, possibly by
//!   another process sharing the same [`Checkpointer`].
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Next`, the run loop.
//! - [`state`]: `StateSchema`, `State`, `StateUpdate`.
//! - [`memory`]: `RunRecord`, `Checkpointer`, `MemorySaver`, `SqliteSaver` (feature `sqlite`).
//! - [`react`]: prebuilt `LlmNode`, `ToolNode` and `tools_condition`.
//! - [`llm`], [`tools`], [`message`]: the interfaces those nodes talk to.
//! - [`stream`]: event stream of a run.
//!
//! ## Features
//!
//! - `sqlite` (default): persistent checkpointer; runs survive process restarts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use stategraph::{FnNode, NodeOutput, RunOutcome, StateGraph, StateSchema, StateUpdate, END, START};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = StateSchema::new().replace("final");
//! let mut graph = StateGraph::new(schema);
//! graph
//!     .add_node("human", Arc::new(FnNode::new(|_, ctx| {
//!         let answer = ctx.interrupt(json!({"question": "approve?"}))?;
//!         let verdict = if answer["decision"] == "yes" { "approved" } else { "rejected" };
//!         Ok(NodeOutput::update(StateUpdate::new().set("final", verdict)))
//!     })))?
//!     .add_edge(START, "human")
//!     .add_edge("human", END);
//! let graph = graph.compile()?;
//!
//! let started = graph.start(StateUpdate::new()).await?;
//! assert!(matches!(started.outcome, RunOutcome::Suspended(_)));
//! let done = graph.resume(&started.run_id, json!({"decision": "yes"})).await?;
//! assert_eq!(done.state().and_then(|s| s.get_str("final")), Some("approved"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod message;
pub mod react;
pub mod state;
pub mod stream;
pub mod tools;

pub use error::{NodeError, RunError};
pub use graph::{
    CompilationError, CompileOptions, CompileWarning, CompiledStateGraph, FnNode,
    LoggingMiddleware, Next, Node, NodeCall, NodeContext, NodeFuture, NodeMiddleware, NodeOutput,
    RunOutcome, RunResult, StateGraph, END, START,
};
pub use llm::{LlmClient, LlmResponse, MockLlm};
pub use memory::{
    CheckpointError, Checkpointer, Interrupt, JsonSerializer, MemorySaver, RunRecord,
    RunStatus, RunnableConfig, Serializer, DEFAULT_RECURSION_LIMIT,
};
#[cfg(feature = "sqlite")]
pub use memory::SqliteSaver;
pub use message::{Message, ToolCall, MESSAGES_FIELD};
pub use react::{tools_condition, HandleToolErrors, LlmNode, ToolNode, TOOLS_LABEL};
pub use state::{MergePolicy, State, StateError, StateSchema, StateUpdate};
pub use stream::{StreamEvent, StreamMode};
pub use tools::{FnTool, Tool, ToolError, ToolRegistry, ToolSpec};
