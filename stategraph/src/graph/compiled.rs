//! Compiled state graph: frozen structure plus the run loop.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. Cheap to clone; every clone
//! shares the same nodes, edges and checkpointer, so one compiled graph can drive many runs
//! concurrently. Each run owns its state; the checkpointer is the only shared mutable part.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashSet;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::error::RunError;
use crate::memory::{Checkpointer, Interrupt, RunRecord, RunStatus, RunnableConfig};
use crate::state::{State, StateSchema, StateUpdate};
use crate::stream::{StreamEvent, StreamMode, StreamSink};

use super::edge::EdgeTable;
use super::logging::{
    log_node_complete, log_node_start, log_route, log_run_complete, log_run_error,
    log_run_start, log_run_suspended, log_state_update,
};
use super::registry::Invocation;
use super::{
    CompileWarning, Next, NodeContext, NodeMiddleware, NodeRegistry, RunOutcome, RunResult, END,
    START,
};

struct Inner {
    schema: StateSchema,
    nodes: NodeRegistry,
    edges: EdgeTable,
    checkpointer: Arc<dyn Checkpointer>,
    middleware: Option<Arc<dyn NodeMiddleware>>,
    warnings: Vec<CompileWarning>,
}

/// Compiled graph: immutable structure, drives runs.
///
/// Caller API: [`start`](Self::start) a run with an input update, [`resume`](Self::resume) a
/// suspended one with the caller's answer, [`get_run`](Self::get_run) to re-fetch its record.
/// Every node step is checkpointed, so a run suspended here can be resumed by another
/// process whose graph was compiled from the same declarations over the same store.
#[derive(Clone)]
pub struct CompiledStateGraph {
    inner: Arc<Inner>,
    /// Run ids currently being driven by some task.
    active: Arc<DashSet<String>>,
}

/// Marks a run id as driven until dropped.
struct ActiveRun {
    active: Arc<DashSet<String>>,
    run_id: String,
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        self.active.remove(&self.run_id);
    }
}

impl CompiledStateGraph {
    pub(super) fn new(
        schema: StateSchema,
        nodes: NodeRegistry,
        edges: EdgeTable,
        checkpointer: Arc<dyn Checkpointer>,
        middleware: Option<Arc<dyn NodeMiddleware>>,
        warnings: Vec<CompileWarning>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                schema,
                nodes,
                edges,
                checkpointer,
                middleware,
                warnings,
            }),
            active: Arc::new(DashSet::new()),
        }
    }

    /// Non-fatal findings from compilation.
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.inner.warnings
    }

    pub fn schema(&self) -> &StateSchema {
        &self.inner.schema
    }

    pub fn checkpointer(&self) -> &Arc<dyn Checkpointer> {
        &self.inner.checkpointer
    }

    /// Starts a new run under a generated id.
    pub async fn start(&self, input: StateUpdate) -> Result<RunResult, RunError> {
        self.start_with_config(input, RunnableConfig::default()).await
    }

    /// Starts a run under `config.thread_id` (generated when unset).
    ///
    /// The input is merged into the schema defaults as an ordinary update. An existing
    /// finished record under the same id is overwritten; a suspended one is not
    /// (`RunSuspended`), nor is a mid-flight one (`RunInFlight`, see
    /// [`continue_run`](Self::continue_run)).
    ///
    /// Returns `Err` only when no step could be attempted (busy, suspended, in flight, storage
    /// failure). Failures inside the run come back as [`RunOutcome::Failed`].
    pub async fn start_with_config(
        &self,
        input: StateUpdate,
        config: RunnableConfig,
    ) -> Result<RunResult, RunError> {
        let run_id = config
            .thread_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let outcome = self.start_run(&run_id, input, &config, None).await?;
        Ok(RunResult { run_id, outcome })
    }

    /// Resumes the suspended run `run_id`; `value` is returned by the pending
    /// `NodeContext::interrupt` call when the interrupted node is re-entered.
    pub async fn resume(
        &self,
        run_id: &str,
        value: impl Into<Value>,
    ) -> Result<RunOutcome, RunError> {
        self.resume_with_config(RunnableConfig::for_thread(run_id), value)
            .await
    }

    /// Like [`resume`](Self::resume), with an explicit config (`thread_id` required).
    pub async fn resume_with_config(
        &self,
        config: RunnableConfig,
        value: impl Into<Value>,
    ) -> Result<RunOutcome, RunError> {
        let run_id = config.thread_id.clone().ok_or(RunError::ThreadIdRequired)?;
        self.resume_run(&run_id, value.into(), &config, None).await
    }

    /// Re-drives a run whose last checkpoint is mid-flight (status `Running`), as left behind
    /// by a crashed process or a checkpoint write that failed between nodes.
    ///
    /// Execution picks up at the record's `pending_node` with the checkpointed state, so only
    /// the node that was in flight runs again.
    pub async fn continue_run(&self, run_id: &str) -> Result<RunOutcome, RunError> {
        self.continue_with_config(RunnableConfig::for_thread(run_id))
            .await
    }

    /// Like [`continue_run`](Self::continue_run), with an explicit config (`thread_id` required).
    pub async fn continue_with_config(
        &self,
        config: RunnableConfig,
    ) -> Result<RunOutcome, RunError> {
        let run_id = config.thread_id.clone().ok_or(RunError::ThreadIdRequired)?;
        let _active = self.claim(&run_id)?;
        let record = self.get_run(&run_id).await?;
        if record.status != RunStatus::Running {
            return Err(RunError::NotInFlight {
                run_id,
                status: record.status,
            });
        }
        log_run_start(&run_id, true);
        self.run_loop(record, &config, None).await
    }

    /// Loads the current record of `run_id`. Finished runs keep their record.
    pub async fn get_run(&self, run_id: &str) -> Result<RunRecord, RunError> {
        self.inner
            .checkpointer
            .load(run_id)
            .await?
            .ok_or_else(|| RunError::RunNotFound(run_id.to_string()))
    }

    /// State of `run_id` as of its last checkpoint.
    pub async fn get_state(&self, run_id: &str) -> Result<State, RunError> {
        Ok(self.get_run(run_id).await?.state)
    }

    /// Starts a run on a spawned task and streams its events.
    ///
    /// Returns the run id with the stream. Per-node events follow `modes`; the last event is
    /// always `Interrupt`, `Completed` or `Failed`.
    pub fn stream(
        &self,
        input: StateUpdate,
        config: RunnableConfig,
        modes: impl Into<HashSet<StreamMode>>,
    ) -> (String, ReceiverStream<StreamEvent>) {
        let run_id = config
            .thread_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let (tx, rx) = mpsc::channel(128);
        let sink = StreamSink::new(tx, modes.into());
        let graph = self.clone();
        let id = run_id.clone();

        tokio::spawn(async move {
            let result = graph.start_run(&id, input, &config, Some(&sink)).await;
            sink.emit(final_event(result)).await;
        });

        (run_id, ReceiverStream::new(rx))
    }

    /// Resumes a suspended run on a spawned task and streams its events.
    pub fn stream_resume(
        &self,
        config: RunnableConfig,
        value: impl Into<Value>,
        modes: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(128);
        let sink = StreamSink::new(tx, modes.into());
        let graph = self.clone();
        let value = value.into();

        tokio::spawn(async move {
            let result = match config.thread_id.clone() {
                Some(run_id) => graph.resume_run(&run_id, value, &config, Some(&sink)).await,
                None => Err(RunError::ThreadIdRequired),
            };
            sink.emit(final_event(result)).await;
        });

        ReceiverStream::new(rx)
    }

    fn claim(&self, run_id: &str) -> Result<ActiveRun, RunError> {
        if !self.active.insert(run_id.to_string()) {
            return Err(RunError::RunBusy(run_id.to_string()));
        }
        Ok(ActiveRun {
            active: self.active.clone(),
            run_id: run_id.to_string(),
        })
    }

    async fn start_run(
        &self,
        run_id: &str,
        input: StateUpdate,
        config: &RunnableConfig,
        sink: Option<&StreamSink>,
    ) -> Result<RunOutcome, RunError> {
        let _active = self.claim(run_id)?;
        if let Some(existing) = self.inner.checkpointer.load(run_id).await? {
            match existing.status {
                RunStatus::Suspended => return Err(RunError::RunSuspended(run_id.to_string())),
                RunStatus::Running => return Err(RunError::RunInFlight(run_id.to_string())),
                _ => {}
            }
        }
        log_run_start(run_id, false);

        let mut record = RunRecord::new(run_id, self.inner.schema.defaults(), Some(START.into()));
        record.status = RunStatus::Running;
        record.state = match self.inner.schema.initial_state(&input) {
            Ok(state) => state,
            Err(source) => {
                let error = RunError::Schema {
                    node_id: START.to_string(),
                    source,
                };
                return self.fail(record, error).await;
            }
        };

        let first = match self.inner.edges.next(START, &record.state, &Next::Continue) {
            Ok(first) => first,
            Err(error) => return self.fail(record, error).await,
        };
        log_route(run_id, START, &first);
        if first != END && !self.inner.nodes.contains(&first) {
            return self.fail(record, RunError::UnknownNodeId(first)).await;
        }
        record.pending_node = Some(first);
        self.save(&mut record).await?;

        self.run_loop(record, config, sink).await
    }

    async fn resume_run(
        &self,
        run_id: &str,
        value: Value,
        config: &RunnableConfig,
        sink: Option<&StreamSink>,
    ) -> Result<RunOutcome, RunError> {
        let _active = self.claim(run_id)?;
        let mut record = self.get_run(run_id).await?;
        if record.status != RunStatus::Suspended {
            return Err(RunError::NotSuspended {
                run_id: run_id.to_string(),
                status: record.status,
            });
        }
        log_run_start(run_id, true);

        record.resume_values.push(value);
        record.status = RunStatus::Running;
        self.run_loop(record, config, sink).await
    }

    /// Steps through nodes from `record.pending_node` until END, an interrupt, a failure or
    /// the recursion limit. The record is persisted after every node.
    async fn run_loop(
        &self,
        mut record: RunRecord,
        config: &RunnableConfig,
        sink: Option<&StreamSink>,
    ) -> Result<RunOutcome, RunError> {
        let run_id = record.run_id.clone();
        let mut steps = 0usize;

        loop {
            let node_id = match record.pending_node.clone() {
                Some(id) if id != END => id,
                _ => return self.complete(record).await,
            };
            if steps >= config.recursion_limit {
                return self
                    .fail(record, RunError::RecursionLimit(config.recursion_limit))
                    .await;
            }

            log_node_start(&run_id, &node_id);
            let ctx = NodeContext::new(
                run_id.as_str(),
                node_id.as_str(),
                record.step,
                config.clone(),
                record.resume_values.clone(),
            );
            let invocation = self
                .inner
                .nodes
                .invoke(&node_id, record.state.clone(), ctx, self.inner.middleware.as_ref())
                .await;
            let output = match invocation {
                Ok(Invocation::Completed(output)) => output,
                Ok(Invocation::Interrupted(payload)) => {
                    return self.suspend(record, node_id, payload).await
                }
                Err(error) => return self.fail(record, error).await,
            };
            log_node_complete(&run_id, &node_id, &output.next);

            let state = match record.state.apply_update(&self.inner.schema, &output.update) {
                Ok(state) => state,
                Err(source) => {
                    let error = RunError::Schema {
                        node_id: node_id.clone(),
                        source,
                    };
                    return self.fail(record, error).await;
                }
            };
            log_state_update(&run_id, &node_id, output.update.len());
            record.state = state;
            record.resume_values.clear();
            record.interrupt = None;
            record.step += 1;
            steps += 1;
            if let Some(sink) = sink {
                sink.node_finished(&node_id, &output.update, &record.state)
                    .await;
            }

            let next = match self.inner.edges.next(&node_id, &record.state, &output.next) {
                Ok(next) => next,
                Err(error) => return self.fail(record, error).await,
            };
            if next != END && !self.inner.nodes.contains(&next) {
                return self.fail(record, RunError::UnknownNodeId(next)).await;
            }
            log_route(&run_id, &node_id, &next);
            record.pending_node = Some(next);
            self.save(&mut record).await?;
        }
    }

    async fn complete(&self, mut record: RunRecord) -> Result<RunOutcome, RunError> {
        record.status = RunStatus::Completed;
        record.pending_node = None;
        record.interrupt = None;
        self.save(&mut record).await?;
        log_run_complete(&record.run_id, record.step);
        Ok(RunOutcome::Completed(record.state))
    }

    async fn suspend(
        &self,
        mut record: RunRecord,
        node_id: String,
        payload: Value,
    ) -> Result<RunOutcome, RunError> {
        let interrupt = Interrupt { node_id, payload };
        record.status = RunStatus::Suspended;
        record.pending_node = Some(interrupt.node_id.clone());
        record.interrupt = Some(interrupt.clone());
        self.save(&mut record).await?;
        log_run_suspended(&record.run_id, &interrupt.node_id);
        Ok(RunOutcome::Suspended(interrupt))
    }

    /// Persists the run as failed and reports the error as the run's outcome.
    async fn fail(&self, mut record: RunRecord, error: RunError) -> Result<RunOutcome, RunError> {
        record.status = RunStatus::Failed;
        record.error = Some(error.to_string());
        self.save(&mut record).await?;
        log_run_error(&record.run_id, &error);
        Ok(RunOutcome::Failed(error))
    }

    async fn save(&self, record: &mut RunRecord) -> Result<(), RunError> {
        record.touch();
        self.inner
            .checkpointer
            .save(&record.run_id, record)
            .await?;
        Ok(())
    }
}

fn final_event(result: Result<RunOutcome, RunError>) -> StreamEvent {
    match result {
        Ok(RunOutcome::Completed(state)) => StreamEvent::Completed(state),
        Ok(RunOutcome::Suspended(interrupt)) => StreamEvent::Interrupt(interrupt),
        Ok(RunOutcome::Failed(error)) | Err(error) => StreamEvent::Failed(error),
    }
}
