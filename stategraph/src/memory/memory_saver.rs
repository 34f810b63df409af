//! In-memory checkpointer (MemorySaver).
//!
//! Records live in a `DashMap`; each save replaces the whole entry under the shard lock, so
//! saves are atomic per run id and runs never contend on each other's keys.

use async_trait::async_trait;
use dashmap::DashMap;

use super::checkpointer::ensure_run_id;
use super::{CheckpointError, Checkpointer, RunRecord};

/// In-memory checkpointer. Lost when dropped; use for tests and single-process runs.
#[derive(Debug, Default)]
pub struct MemorySaver {
    records: DashMap<String, RunRecord>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn save(&self, run_id: &str, record: &RunRecord) -> Result<(), CheckpointError> {
        ensure_run_id(run_id, record)?;
        self.records.insert(run_id.to_string(), record.clone());
        Ok(())
    }

    async fn load(&self, run_id: &str) -> Result<Option<RunRecord>, CheckpointError> {
        Ok(self.records.get(run_id).map(|r| r.value().clone()))
    }

    async fn delete(&self, run_id: &str) -> Result<bool, CheckpointError> {
        Ok(self.records.remove(run_id).is_some())
    }

    async fn list(&self) -> Result<Vec<String>, CheckpointError> {
        let mut ids: Vec<String> = self.records.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        Ok(ids)
    }
}
