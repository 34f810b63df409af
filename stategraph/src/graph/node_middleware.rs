//! Node middleware: wraps every node invocation of a compiled graph.
//!
//! Attach with [`StateGraph::with_middleware`](super::StateGraph::with_middleware). The run
//! loop hands the middleware the node id, the state snapshot, the context and the wrapped
//! call; the middleware decides how (and whether) to invoke it. Useful for logging, timing,
//! or a caller-chosen retry policy. The engine itself never retries.

use std::time::Instant;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::state::State;

use super::{NodeCall, NodeContext, NodeOutput};

#[async_trait]
pub trait NodeMiddleware: Send + Sync {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        ctx: NodeContext,
        inner: NodeCall,
    ) -> Result<NodeOutput, NodeError>;
}

/// Middleware that logs node enter/exit with elapsed time at `info` level.
///
/// The run loop already emits `debug` events per node; this is for callers who want node
/// boundaries visible at the default log level.
pub struct LoggingMiddleware;

#[async_trait]
impl NodeMiddleware for LoggingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        ctx: NodeContext,
        inner: NodeCall,
    ) -> Result<NodeOutput, NodeError> {
        let run_id = ctx.run_id().to_string();
        tracing::info!(run_id = %run_id, node_id, "enter node");
        let started = Instant::now();
        let result = inner(state, ctx).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(output) => {
                tracing::info!(run_id = %run_id, node_id, next = %output.next, elapsed_ms, "exit node")
            }
            Err(NodeError::Interrupted(_)) => {
                tracing::info!(run_id = %run_id, node_id, elapsed_ms, "node interrupted")
            }
            Err(e) => {
                tracing::warn!(run_id = %run_id, node_id, error = %e, elapsed_ms, "node failed")
            }
        }
        result
    }
}
