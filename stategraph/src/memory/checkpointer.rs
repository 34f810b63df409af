//! Checkpointer trait and CheckpointError.
//!
//! Saves and loads one [`RunRecord`] per run id. Implementations must make each `save`
//! atomic per run id: a concurrent `load` sees either the old or the new record, never a mix.

use async_trait::async_trait;

use super::RunRecord;

/// Error type for checkpoint operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CheckpointError {
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("storage: {0}")]
    Storage(String),
    /// `save` was called with a record belonging to another run.
    #[error("record for run `{found}` saved under `{expected}`")]
    RunIdMismatch { expected: String, found: String },
}

/// Persists run records keyed by run id.
///
/// Implementations: [`MemorySaver`](super::MemorySaver) (in-memory) and, with feature
/// `sqlite`, [`SqliteSaver`](super::SqliteSaver). Swapping implementations does not change
/// run behavior.
///
/// **Interaction**: Injected at compile via `StateGraph::compile_with_checkpointer`; the run
/// loop is its only writer.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Stores `record` as the latest record of `run_id`, replacing any previous one.
    async fn save(&self, run_id: &str, record: &RunRecord) -> Result<(), CheckpointError>;

    /// Latest record of `run_id`; `None` if the run was never saved (or was deleted).
    /// Finished runs keep returning their final record.
    async fn load(&self, run_id: &str) -> Result<Option<RunRecord>, CheckpointError>;

    /// Removes the record of `run_id`; returns whether one existed.
    async fn delete(&self, run_id: &str) -> Result<bool, CheckpointError>;

    /// All stored run ids, sorted.
    async fn list(&self) -> Result<Vec<String>, CheckpointError>;
}

pub(crate) fn ensure_run_id(run_id: &str, record: &RunRecord) -> Result<(), CheckpointError> {
    if record.run_id != run_id {
        return Err(CheckpointError::RunIdMismatch {
            expected: run_id.to_string(),
            found: record.run_id.clone(),
        });
    }
    Ok(())
}
