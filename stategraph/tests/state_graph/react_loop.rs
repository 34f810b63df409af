//! The llm/tool loop: `START -> llm -> (tool | END)`, `tool -> llm`.

use std::sync::Arc;

use serde_json::{json, Value};
use stategraph::message::read_messages;
use stategraph::{
    tools_condition, FnNode, FnTool, LlmNode, LlmResponse, Message, MockLlm, RunOutcome,
    StateGraph, StateSchema, StateUpdate, ToolCall, ToolError, ToolNode, ToolRegistry, ToolSpec,
    END, MESSAGES_FIELD, START, TOOLS_LABEL,
};

use crate::common::RecordingMiddleware;

/// **Scenario**: llm appends one message and flips the route flag from "tool" to "end";
/// the run visits llm, tool, llm and ends with two messages.
#[tokio::test]
async fn llm_tool_llm_end_trace() {
    let schema = StateSchema::new().append("messages").replace("route");
    let llm = FnNode::new(|state, _| {
        let turns = state.get_list("messages").map(Vec::len).unwrap_or(0);
        let route = if turns == 0 { "tool" } else { "end" };
        Ok(StateUpdate::new()
            .set("messages", format!("llm turn {}", turns + 1))
            .set("route", route)
            .into())
    });
    let tool = FnNode::new(|_, _| Ok(StateUpdate::new().into()));
    let recorder = Arc::new(RecordingMiddleware::default());

    let mut graph = StateGraph::new(schema);
    graph
        .add_node("llm", Arc::new(llm))
        .unwrap()
        .add_node("tool", Arc::new(tool))
        .unwrap()
        .add_edge(START, "llm")
        .add_conditional_edges(
            "llm",
            |s| s.get_str("route").unwrap_or("end").to_string(),
            [("tool", "tool"), ("end", END)],
        )
        .add_edge("tool", "llm");
    let graph = graph.with_middleware(recorder.clone()).compile().unwrap();

    let result = graph
        .start(StateUpdate::new().set("messages", json!([])))
        .await
        .unwrap();
    let state = result.outcome.state().cloned().expect("completed");
    assert_eq!(recorder.calls(), vec!["llm", "tool", "llm"]);
    assert_eq!(state.get_list("messages").map(Vec::len), Some(2));
    assert_eq!(graph.get_run(&result.run_id).await.unwrap().step, 3);
}

fn add_tool() -> Arc<FnTool> {
    Arc::new(FnTool::new(
        ToolSpec {
            name: "add".into(),
            description: Some("Adds a and b.".into()),
            input_schema: json!({"type": "object"}),
        },
        |args: Value| async move {
            let a = args["a"]
                .as_i64()
                .ok_or_else(|| ToolError::InvalidArguments("a".into()))?;
            let b = args["b"]
                .as_i64()
                .ok_or_else(|| ToolError::InvalidArguments("b".into()))?;
            Ok::<_, ToolError>((a + b).to_string())
        },
    ))
}

fn react_graph(llm: MockLlm) -> stategraph::CompiledStateGraph {
    let mut tools = ToolRegistry::new();
    tools.register(add_tool()).unwrap();
    let tools = Arc::new(tools);

    let mut graph = StateGraph::new(StateSchema::new().append(MESSAGES_FIELD));
    graph
        .add_node(
            "llm",
            Arc::new(LlmNode::new(Arc::new(llm)).with_tools(tools.specs())),
        )
        .unwrap()
        .add_node("tool", Arc::new(ToolNode::new(tools)))
        .unwrap()
        .add_edge(START, "llm")
        .add_conditional_edges("llm", tools_condition, [(TOOLS_LABEL, "tool"), (END, END)])
        .add_edge("tool", "llm");
    graph.compile().unwrap()
}

fn user(text: &str) -> StateUpdate {
    StateUpdate::new()
        .set_serialized(MESSAGES_FIELD, &[Message::user(text)])
        .unwrap()
}

/// **Scenario**: Prebuilt LlmNode/ToolNode run a tool call and answer with its result.
#[tokio::test]
async fn prebuilt_react_loop_answers_with_tool_result() {
    let llm = MockLlm::new([
        LlmResponse::tool_calls(vec![ToolCall::new("c1", "add", json!({"a": 2, "b": 1}))]),
        LlmResponse::text("2 + 1 = 3"),
    ]);
    let graph = react_graph(llm);

    let result = graph.start(user("what is 2 + 1?")).await.unwrap();
    let state = result.outcome.state().cloned().expect("completed");
    let messages = read_messages(&state, MESSAGES_FIELD).unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2], Message::tool("c1", "add", "3"));
    assert_eq!(messages[3].content(), "2 + 1 = 3");
}

/// **Scenario**: A call to an unregistered tool fails the run as a node error, not a panic.
#[tokio::test]
async fn unknown_tool_fails_run() {
    let llm = MockLlm::new([LlmResponse::tool_calls(vec![ToolCall::new(
        "c1",
        "mul",
        json!({}),
    )])]);
    let graph = react_graph(llm);

    let result = graph.start(user("2 * 3?")).await.unwrap();
    match result.outcome {
        RunOutcome::Failed(err) => {
            let text = err.to_string();
            assert!(text.contains("tool"), "{}", text);
            assert!(text.contains("mul"), "{}", text);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}
