//! Shared helpers for StateGraph integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use stategraph::{
    Checkpointer, CompiledStateGraph, FnNode, Next, Node, NodeCall, NodeContext, NodeError,
    NodeMiddleware, NodeOutput, State, StateGraph, StateSchema, StateUpdate, END, START,
};

/// Node that appends its own name to the `trace` field.
pub fn tracer(name: &'static str) -> Arc<dyn Node> {
    Arc::new(FnNode::new(move |_, _| {
        Ok(StateUpdate::new().set("trace", name).into())
    }))
}

/// Schema with an APPEND `trace` field.
pub fn trace_schema() -> StateSchema {
    StateSchema::new().append("trace")
}

pub fn trace_of(state: &State) -> Vec<String> {
    state.decode("trace").unwrap_or_default()
}

/// Middleware recording the id of every node invocation.
#[derive(Default)]
pub struct RecordingMiddleware {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingMiddleware {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeMiddleware for RecordingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        ctx: NodeContext,
        inner: NodeCall,
    ) -> Result<NodeOutput, NodeError> {
        self.calls.lock().unwrap().push(node_id.to_string());
        inner(state, ctx).await
    }
}

/// `START -> human`, human asks `{"question":"approve?"}` and jumps to `approve` or `reject`.
pub fn approval_graph(checkpointer: Arc<dyn Checkpointer>) -> CompiledStateGraph {
    let schema = StateSchema::new()
        .replace("decision")
        .replace("final")
        .append("trace");
    let human = FnNode::new(|_, ctx| {
        let answer = ctx.interrupt(json!({"question": "approve?"}))?;
        let next = if answer["decision"] == "yes" {
            "approve"
        } else {
            "reject"
        };
        Ok(NodeOutput::goto(
            StateUpdate::new()
                .set("decision", answer["decision"].clone())
                .set("trace", "human"),
            Next::node(next),
        ))
    });
    let verdict = |value: &'static str| -> Arc<dyn Node> {
        Arc::new(FnNode::new(move |_, _| {
            Ok(StateUpdate::new().set("final", value).into())
        }))
    };

    let mut graph = StateGraph::new(schema);
    graph
        .add_node_with_destinations("human", Arc::new(human), ["approve", "reject"])
        .unwrap()
        .add_node("approve", verdict("approved"))
        .unwrap()
        .add_node("reject", verdict("rejected"))
        .unwrap()
        .add_edge(START, "human")
        .add_edge("approve", END)
        .add_edge("reject", END);
    graph.compile_with_checkpointer(checkpointer).unwrap()
}

pub fn final_of(state: &State) -> Option<Value> {
    state.get("final").cloned()
}
