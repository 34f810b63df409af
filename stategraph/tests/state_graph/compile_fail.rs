//! StateGraph compile failure cases: unknown node, no path to END, bad edges.

use stategraph::{
    CompilationError, CompileOptions, CompileWarning, StateGraph, StateSchema, END, START,
};

use crate::common::{trace_schema, tracer};

/// **Scenario**: Edge to an undeclared node fails compile before anything runs.
#[test]
fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::new(trace_schema());
    graph
        .add_node("echo", tracer("echo"))
        .unwrap()
        .add_edge(START, "echo")
        .add_edge("echo", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound { node, edge }) => {
            assert_eq!(node, "missing");
            assert!(edge.contains("echo"), "{}", edge);
        }
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

/// **Scenario**: A graph without any START-to-END path fails compile.
#[test]
fn compile_fails_without_path_to_end() {
    let mut graph = StateGraph::new(trace_schema());
    graph
        .add_node("a", tracer("a"))
        .unwrap()
        .add_node("b", tracer("b"))
        .unwrap()
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", "a");
    assert_eq!(graph.compile().err(), Some(CompilationError::EndUnreachable));
}

/// **Scenario**: A graph without an edge from START fails compile.
#[test]
fn compile_fails_without_start_edge() {
    let mut graph = StateGraph::new(trace_schema());
    graph.add_node("a", tracer("a")).unwrap().add_edge("a", END);
    assert_eq!(graph.compile().err(), Some(CompilationError::MissingStart));
}

/// **Scenario**: Conditional label pointing at an undeclared node fails compile.
#[test]
fn compile_fails_when_conditional_label_targets_unknown_node() {
    let mut graph = StateGraph::new(trace_schema());
    graph
        .add_node("llm", tracer("llm"))
        .unwrap()
        .add_edge(START, "llm")
        .add_conditional_edges(
            "llm",
            |_| "tool".to_string(),
            [("tool", "tool"), ("end", END)],
        );
    assert!(matches!(
        graph.compile().err(),
        Some(CompilationError::NodeNotFound { node, .. }) if node == "tool"
    ));
}

/// **Scenario**: Two unconditional edges out of one node are rejected.
#[test]
fn compile_fails_on_duplicate_unconditional_edge() {
    let mut graph = StateGraph::new(StateSchema::new().append("trace"));
    graph
        .add_node("a", tracer("a"))
        .unwrap()
        .add_edge(START, "a")
        .add_edge("a", END)
        .add_edge("a", "a");
    assert!(matches!(
        graph.compile().err(),
        Some(CompilationError::DuplicateEdge { from, .. }) if from == "a"
    ));
}

/// **Scenario**: Unreachable node is a warning, or an error under strict options.
#[test]
fn unreachable_node_warning_and_strict_error() {
    let build = || {
        let mut graph = StateGraph::new(trace_schema());
        graph
            .add_node("a", tracer("a"))
            .unwrap()
            .add_node("island", tracer("island"))
            .unwrap()
            .add_edge(START, "a")
            .add_edge("a", END);
        graph
    };
    let compiled = build().compile().unwrap();
    assert_eq!(
        compiled.warnings(),
        &[CompileWarning::UnreachableNode("island".into())]
    );
    assert_eq!(
        build()
            .with_options(CompileOptions::strict())
            .compile()
            .err(),
        Some(CompilationError::Unreachable(vec!["island".into()]))
    );
}
