//! Graph builders used by the demo binaries.

use std::sync::Arc;

use serde_json::{json, Value};
use stategraph::{
    tools_condition, Checkpointer, CompiledStateGraph, FnNode, FnTool,
    LlmClient, LlmNode, LoggingMiddleware, Next, NodeOutput, StateGraph, StateSchema,
    StateUpdate, ToolError, ToolNode, ToolRegistry, ToolSpec, END, MESSAGES_FIELD, START,
    TOOLS_LABEL,
};

use crate::Error;

/// Payload the approval node hands to the caller.
pub const APPROVAL_QUESTION: &str = "approve?";

/// Tool adding two integers `a` and `b`.
pub fn add_tool() -> FnTool {
    FnTool::new(
        ToolSpec {
            name: "add".into(),
            description: Some("Adds two integers a and b.".into()),
            input_schema: json!({
                "type": "object",
                "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
                "required": ["a", "b"]
            }),
        },
        |args: Value| async move {
            let arg = |name: &str| {
                args[name]
                    .as_i64()
                    .ok_or_else(|| ToolError::InvalidArguments(format!("`{}` must be an integer", name)))
            };
            Ok::<_, ToolError>((arg("a")? + arg("b")?).to_string())
        },
    )
}

/// `START -> llm -> (tool | END)`, `tool -> llm`, over a `messages` APPEND field.
pub fn react_loop_graph(
    llm: Arc<dyn LlmClient>,
    checkpointer: Arc<dyn Checkpointer>,
) -> Result<CompiledStateGraph, Error> {
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(add_tool()))?;
    let tools = Arc::new(tools);

    let mut graph = StateGraph::new(StateSchema::new().append(MESSAGES_FIELD));
    graph
        .add_node("llm", Arc::new(LlmNode::new(llm).with_tools(tools.specs())))?
        .add_node("tool", Arc::new(ToolNode::new(tools)))?
        .add_edge(START, "llm")
        .add_conditional_edges("llm", tools_condition, [(TOOLS_LABEL, "tool"), (END, END)])
        .add_edge("tool", "llm");
    let compiled = graph
        .with_middleware(Arc::new(LoggingMiddleware))
        .compile_with_checkpointer(checkpointer)?;
    Ok(compiled)
}

/// `START -> review`; review asks [`APPROVAL_QUESTION`] and jumps to `approve` or `reject`,
/// each of which writes `final` and ends.
pub fn approval_graph(
    checkpointer: Arc<dyn Checkpointer>,
) -> Result<CompiledStateGraph, Error> {
    let schema = StateSchema::new()
        .replace("request")
        .replace("decision")
        .replace("final");
    let review = FnNode::new(|state, ctx| {
        let answer = ctx.interrupt(json!({
            "question": APPROVAL_QUESTION,
            "request": state.get("request").cloned().unwrap_or(Value::Null),
        }))?;
        let decision = answer["decision"].as_str().unwrap_or("no").to_string();
        let next = if decision == "yes" { "approve" } else { "reject" };
        Ok(NodeOutput::goto(
            StateUpdate::new().set("decision", decision),
            Next::node(next),
        ))
    });
    let approve = FnNode::new(|_, _| Ok(StateUpdate::new().set("final", "approved").into()));
    let reject = FnNode::new(|_, _| Ok(StateUpdate::new().set("final", "rejected").into()));

    let mut graph = StateGraph::new(schema);
    graph
        .add_node_with_destinations("review", Arc::new(review), ["approve", "reject"])?
        .add_node("approve", Arc::new(approve))?
        .add_node("reject", Arc::new(reject))?
        .add_edge(START, "review")
        .add_edge("approve", END)
        .add_edge("reject", END);
    let compiled = graph
        .with_middleware(Arc::new(LoggingMiddleware))
        .compile_with_checkpointer(checkpointer)?;
    Ok(compiled)
}
