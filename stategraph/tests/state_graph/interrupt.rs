//! Suspend and resume through NodeContext::interrupt.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;
use stategraph::{
    FnNode, Interrupt, MemorySaver, RunError, RunOutcome, RunStatus, RunnableConfig, StateGraph,
    StateSchema, StateUpdate, StreamEvent, StreamMode, END, START,
};

use crate::common::{approval_graph, final_of, trace_of};

/// **Scenario**: start suspends with the node's payload; resume completes with "approved".
#[tokio::test]
async fn approve_scenario() {
    let graph = approval_graph(Arc::new(MemorySaver::new()));

    let started = graph.start(StateUpdate::new()).await.unwrap();
    match &started.outcome {
        RunOutcome::Suspended(Interrupt { node_id, payload }) => {
            assert_eq!(node_id, "human");
            assert_eq!(payload, &json!({"question": "approve?"}));
        }
        other => panic!("expected Suspended, got {:?}", other),
    }
    let record = graph.get_run(&started.run_id).await.unwrap();
    assert_eq!(record.status, RunStatus::Suspended);
    assert_eq!(record.pending_node.as_deref(), Some("human"));

    let done = graph
        .resume(&started.run_id, json!({"decision": "yes"}))
        .await
        .unwrap();
    let state = done.state().cloned().expect("completed");
    assert_eq!(final_of(&state), Some(json!("approved")));
    assert_eq!(state.get("decision"), Some(&json!("yes")));
}

/// **Scenario**: Resume reaches the same final state as an equivalent uninterrupted run.
#[tokio::test]
async fn resumed_run_matches_uninterrupted_run() {
    let graph = approval_graph(Arc::new(MemorySaver::new()));
    let started = graph.start(StateUpdate::new()).await.unwrap();
    let resumed = graph
        .resume(&started.run_id, json!({"decision": "no"}))
        .await
        .unwrap();

    let schema = StateSchema::new()
        .replace("decision")
        .replace("final")
        .append("trace");
    let mut direct = StateGraph::new(schema);
    direct
        .add_node(
            "human",
            Arc::new(FnNode::new(|_, _| {
                Ok(StateUpdate::new()
                    .set("decision", "no")
                    .set("trace", "human")
                    .into())
            })),
        )
        .unwrap()
        .add_node(
            "reject",
            Arc::new(FnNode::new(|_, _| {
                Ok(StateUpdate::new().set("final", "rejected").into())
            })),
        )
        .unwrap()
        .add_edge(START, "human")
        .add_edge("human", "reject")
        .add_edge("reject", END);
    let uninterrupted = direct
        .compile()
        .unwrap()
        .start(StateUpdate::new())
        .await
        .unwrap();

    assert_eq!(resumed.state(), uninterrupted.outcome.state());
    assert_eq!(trace_of(resumed.state().unwrap()), vec!["human"]);
}

/// **Scenario**: The interrupted node re-enters from its start; work before the
/// interrupt replays, and two interrupts in one node need two resumes.
#[tokio::test]
async fn multiple_interrupts_replay_node() {
    let entries = Arc::new(AtomicUsize::new(0));
    let counter = entries.clone();
    let node = FnNode::new(move |_, ctx| {
        counter.fetch_add(1, Ordering::SeqCst);
        let name = ctx.interrupt("name?")?;
        let color = ctx.interrupt("color?")?;
        Ok(StateUpdate::new()
            .set("name", name)
            .set("color", color)
            .into())
    });
    let mut graph = StateGraph::new(StateSchema::new().replace("name").replace("color"));
    graph
        .add_node("form", Arc::new(node))
        .unwrap()
        .add_edge(START, "form")
        .add_edge("form", END);
    let graph = graph.compile().unwrap();

    let started = graph.start(StateUpdate::new()).await.unwrap();
    assert_eq!(
        started.outcome.interrupt().map(|i| i.payload.clone()),
        Some(json!("name?"))
    );
    let second = graph.resume(&started.run_id, "ada").await.unwrap();
    assert_eq!(
        second.interrupt().map(|i| i.payload.clone()),
        Some(json!("color?"))
    );
    let done = graph.resume(&started.run_id, "green").await.unwrap();
    let state = done.state().unwrap();
    assert_eq!(state.get_str("name"), Some("ada"));
    assert_eq!(state.get_str("color"), Some("green"));
    assert_eq!(entries.load(Ordering::SeqCst), 3);
}

/// **Scenario**: Resuming a run that is not suspended is rejected and leaves it unchanged.
#[tokio::test]
async fn resume_twice_is_rejected() {
    let graph = approval_graph(Arc::new(MemorySaver::new()));
    let started = graph.start(StateUpdate::new()).await.unwrap();
    graph
        .resume(&started.run_id, json!({"decision": "yes"}))
        .await
        .unwrap();
    assert!(matches!(
        graph.resume(&started.run_id, json!({"decision": "no"})).await,
        Err(RunError::NotSuspended { status: RunStatus::Completed, .. })
    ));
    let state = graph.get_state(&started.run_id).await.unwrap();
    assert_eq!(final_of(&state), Some(json!("approved")));
}

/// **Scenario**: resume_with_config without a thread id is ThreadIdRequired.
#[tokio::test]
async fn resume_without_thread_id() {
    let graph = approval_graph(Arc::new(MemorySaver::new()));
    assert!(matches!(
        graph
            .resume_with_config(RunnableConfig::default(), json!(null))
            .await,
        Err(RunError::ThreadIdRequired)
    ));
}

/// **Scenario**: Streaming a run ends with an Interrupt event; streaming the resume ends
/// with Completed.
#[tokio::test]
async fn stream_interrupt_then_resume() {
    let graph = approval_graph(Arc::new(MemorySaver::new()));
    let (run_id, stream) = graph.stream(
        StateUpdate::new(),
        RunnableConfig::for_thread("streamed"),
        [StreamMode::Values],
    );
    assert_eq!(run_id, "streamed");
    let events: Vec<StreamEvent> = stream.collect().await;
    assert!(matches!(events.as_slice(), [StreamEvent::Interrupt(_)]));

    let events: Vec<StreamEvent> = graph
        .stream_resume(
            RunnableConfig::for_thread("streamed"),
            json!({"decision": "yes"}),
            [StreamMode::Values, StreamMode::Updates],
        )
        .collect()
        .await;
    let updated: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Updates { node_id, .. } => Some(node_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(updated, vec!["human", "approve"]);
    match events.last() {
        Some(StreamEvent::Completed(state)) => {
            assert_eq!(final_of(state), Some(json!("approved")))
        }
        other => panic!("expected Completed, got {:?}", other),
    }
}
