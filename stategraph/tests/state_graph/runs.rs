//! Run-level properties: isolation, idempotent loads, recursion limit, busy runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use stategraph::{
    CheckpointError, Checkpointer, FnNode, MemorySaver, Node, NodeContext, NodeError, NodeOutput,
    RunError, RunOutcome, RunRecord, RunStatus, RunnableConfig, State, StateGraph, StateSchema,
    StateUpdate, END, START,
};
use tokio::sync::Notify;

use crate::common::{trace_schema, tracer};

/// Doubles `input` into `output` after yielding to the scheduler.
struct SlowDouble;

#[async_trait]
impl Node for SlowDouble {
    async fn run(&self, state: State, _ctx: NodeContext) -> Result<NodeOutput, NodeError> {
        let input = state
            .get("input")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| NodeError::ExecutionFailed("input missing".into()))?;
        tokio::time::sleep(Duration::from_millis((input % 5) as u64)).await;
        Ok(StateUpdate::new()
            .set("output", input * 2)
            .set("seen", input)
            .into())
    }
}

/// **Scenario**: Concurrent runs of one compiled graph never observe each other's fields.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_are_isolated() {
    let schema = StateSchema::new()
        .replace("input")
        .replace("output")
        .append("seen");
    let mut graph = StateGraph::new(schema);
    graph
        .add_node("double", Arc::new(SlowDouble))
        .unwrap()
        .add_node("again", Arc::new(SlowDouble))
        .unwrap()
        .add_edge(START, "double")
        .add_edge("double", "again")
        .add_edge("again", END);
    let graph = graph.compile().unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let graph = graph.clone();
            tokio::spawn(async move {
                let result = graph
                    .start(StateUpdate::new().set("input", i))
                    .await
                    .unwrap();
                (i, result)
            })
        })
        .collect();

    for handle in handles {
        let (i, result) = handle.await.unwrap();
        let state = result.outcome.state().cloned().expect("completed");
        assert_eq!(state.get("output"), Some(&json!(i * 2)));
        assert_eq!(state.get("seen"), Some(&json!([i, i])));
    }
}

/// **Scenario**: Loading a completed run twice returns identical records.
#[tokio::test]
async fn completed_run_load_is_idempotent() {
    let mut graph = StateGraph::new(trace_schema());
    graph
        .add_node("a", tracer("a"))
        .unwrap()
        .add_edge(START, "a")
        .add_edge("a", END);
    let graph = graph.compile().unwrap();
    let result = graph.start(StateUpdate::new()).await.unwrap();

    let first = graph.get_run(&result.run_id).await.unwrap();
    let second = graph.get_run(&result.run_id).await.unwrap();
    assert_eq!(first.status, RunStatus::Completed);
    assert_eq!(first, second);
    assert_eq!(Some(&first.state), result.outcome.state());
    assert!(matches!(
        graph.get_run("unknown").await,
        Err(RunError::RunNotFound(_))
    ));
}

/// **Scenario**: A loop that never routes to END fails with RecursionLimit; the
/// checkpoint keeps the state and the node that would have run next.
#[tokio::test]
async fn recursion_limit_fails_and_keeps_checkpoint() {
    let mut graph = StateGraph::new(trace_schema());
    graph
        .add_node("spin", tracer("spin"))
        .unwrap()
        .add_edge(START, "spin")
        .add_conditional_edges(
            "spin",
            |_| "again".to_string(),
            [("again", "spin"), ("done", END)],
        );
    let graph = graph.compile().unwrap();

    let result = graph
        .start_with_config(
            StateUpdate::new(),
            RunnableConfig::for_thread("spinner").with_recursion_limit(5),
        )
        .await
        .unwrap();
    assert!(matches!(
        result.outcome,
        RunOutcome::Failed(RunError::RecursionLimit(5))
    ));

    let record = graph.get_run("spinner").await.unwrap();
    assert_eq!(record.status, RunStatus::Failed);
    assert_eq!(record.step, 5);
    assert_eq!(record.pending_node.as_deref(), Some("spin"));
    assert_eq!(record.state.get_list("trace").map(Vec::len), Some(5));
}

/// Signals `entered`, then waits for `release`.
struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl Node for Gate {
    async fn run(&self, _state: State, _ctx: NodeContext) -> Result<NodeOutput, NodeError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(NodeOutput::default())
    }
}

/// **Scenario**: A second start of a run id that is still being driven is RunBusy.
#[tokio::test]
async fn same_run_id_is_busy_while_driven() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let mut graph = StateGraph::new(StateSchema::new());
    graph
        .add_node(
            "gate",
            Arc::new(Gate {
                entered: entered.clone(),
                release: release.clone(),
            }),
        )
        .unwrap()
        .add_edge(START, "gate")
        .add_edge("gate", END);
    let graph = graph.compile().unwrap();

    let first = {
        let graph = graph.clone();
        tokio::spawn(async move {
            graph
                .start_with_config(StateUpdate::new(), RunnableConfig::for_thread("shared"))
                .await
        })
    };
    entered.notified().await;

    assert!(matches!(
        graph
            .start_with_config(StateUpdate::new(), RunnableConfig::for_thread("shared"))
            .await,
        Err(RunError::RunBusy(id)) if id == "shared"
    ));

    release.notify_one();
    let result = first.await.unwrap().unwrap();
    assert!(result.outcome.is_completed());
}

/// MemorySaver whose `fail_on`-th save (1-based) fails with a storage error.
struct FlakySaver {
    inner: MemorySaver,
    saves: AtomicUsize,
    fail_on: usize,
}

#[async_trait]
impl Checkpointer for FlakySaver {
    async fn save(&self, run_id: &str, record: &RunRecord) -> Result<(), CheckpointError> {
        if self.saves.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
            return Err(CheckpointError::Storage("disk full".into()));
        }
        self.inner.save(run_id, record).await
    }

    async fn load(&self, run_id: &str) -> Result<Option<RunRecord>, CheckpointError> {
        self.inner.load(run_id).await
    }

    async fn delete(&self, run_id: &str) -> Result<bool, CheckpointError> {
        self.inner.delete(run_id).await
    }

    async fn list(&self) -> Result<Vec<String>, CheckpointError> {
        self.inner.list().await
    }
}

/// Appends `name` to `trace` and counts its invocations.
fn counted(name: &'static str, calls: Arc<AtomicUsize>) -> Arc<dyn Node> {
    Arc::new(FnNode::new(move |_, _| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(StateUpdate::new().set("trace", name).into())
    }))
}

/// **Scenario**: A checkpoint write failing between nodes leaves a mid-flight record;
/// continue_run picks up at the pending node without re-running completed ones.
#[tokio::test]
async fn mid_flight_run_continues_from_pending_node() {
    let a_calls = Arc::new(AtomicUsize::new(0));
    let b_calls = Arc::new(AtomicUsize::new(0));
    let saver = Arc::new(FlakySaver {
        inner: MemorySaver::new(),
        saves: AtomicUsize::new(0),
        fail_on: 3,
    });
    let mut graph = StateGraph::new(trace_schema());
    graph
        .add_node("a", counted("a", a_calls.clone()))
        .unwrap()
        .add_node("b", counted("b", b_calls.clone()))
        .unwrap()
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let graph = graph.compile_with_checkpointer(saver).unwrap();

    // Saves: entry (pending a), after a (pending b), after b (fails).
    let crashed = graph
        .start_with_config(StateUpdate::new(), RunnableConfig::for_thread("r"))
        .await;
    assert!(matches!(crashed, Err(RunError::Checkpoint(_))));

    let record = graph.get_run("r").await.unwrap();
    assert_eq!(record.status, RunStatus::Running);
    assert_eq!(record.pending_node.as_deref(), Some("b"));
    assert_eq!(record.state.get("trace"), Some(&json!(["a"])));

    assert!(matches!(
        graph.resume("r", json!(null)).await,
        Err(RunError::NotSuspended { status: RunStatus::Running, .. })
    ));
    assert!(matches!(
        graph
            .start_with_config(StateUpdate::new(), RunnableConfig::for_thread("r"))
            .await,
        Err(RunError::RunInFlight(id)) if id == "r"
    ));

    let outcome = graph.continue_run("r").await.unwrap();
    let state = outcome.state().cloned().expect("completed");
    assert_eq!(state.get("trace"), Some(&json!(["a", "b"])));
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 2);
    assert_eq!(graph.get_run("r").await.unwrap().status, RunStatus::Completed);
}

/// **Scenario**: continue_run refuses records that are not mid-flight.
#[tokio::test]
async fn continue_run_requires_mid_flight_record() {
    let mut graph = StateGraph::new(trace_schema());
    graph
        .add_node("a", tracer("a"))
        .unwrap()
        .add_edge(START, "a")
        .add_edge("a", END);
    let graph = graph.compile().unwrap();

    assert!(matches!(
        graph.continue_run("missing").await,
        Err(RunError::RunNotFound(_))
    ));
    let result = graph.start(StateUpdate::new()).await.unwrap();
    assert!(matches!(
        graph.continue_run(&result.run_id).await,
        Err(RunError::NotInFlight { status: RunStatus::Completed, .. })
    ));
}
