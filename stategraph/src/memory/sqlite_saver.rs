//! SQLite-backed checkpointer (SqliteSaver). Persistent across process restarts.
//!
//! One row per run id, written with `INSERT OR REPLACE`, so each save is a single atomic
//! statement. Blocking rusqlite calls run on `spawn_blocking`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use super::checkpointer::ensure_run_id;
use super::{CheckpointError, Checkpointer, JsonSerializer, RunRecord, Serializer};

fn storage<E: ToString>(e: E) -> CheckpointError {
    CheckpointError::Storage(e.to_string())
}

/// SQLite-backed checkpointer. Key: run id. Record stored as serialized bytes.
///
/// **Interaction**: Used as `Arc<dyn Checkpointer>` via
/// `StateGraph::compile_with_checkpointer`; a new process opening the same file can resume
/// runs suspended by an earlier one.
pub struct SqliteSaver {
    db_path: PathBuf,
    serializer: Arc<dyn Serializer<RunRecord>>,
}

impl SqliteSaver {
    /// Opens (or creates) the database at `path` and ensures the table exists.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let db_path = path.as_ref().to_path_buf();
        let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS run_records (
                run_id TEXT PRIMARY KEY NOT NULL,
                status TEXT NOT NULL,
                record BLOB NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )
        .map_err(storage)?;
        Ok(Self {
            db_path,
            serializer: Arc::new(JsonSerializer),
        })
    }

    /// Replaces the record serializer (default: JSON).
    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer<RunRecord>>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

#[async_trait]
impl Checkpointer for SqliteSaver {
    async fn save(&self, run_id: &str, record: &RunRecord) -> Result<(), CheckpointError> {
        ensure_run_id(run_id, record)?;
        let bytes = self.serializer.serialize(record)?;
        let run_id = run_id.to_string();
        let status = record.status.to_string();
        let updated_at = record.updated_at_ms as i64;
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
            conn.execute(
                "INSERT OR REPLACE INTO run_records (run_id, status, record, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![run_id, status, bytes, updated_at],
            )
            .map_err(storage)?;
            Ok::<(), CheckpointError>(())
        })
        .await
        .map_err(storage)?
    }

    async fn load(&self, run_id: &str) -> Result<Option<RunRecord>, CheckpointError> {
        let run_id = run_id.to_string();
        let db_path = self.db_path.clone();

        let bytes = tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
            conn.query_row(
                "SELECT record FROM run_records WHERE run_id = ?1",
                params![run_id],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
            .map_err(storage)
        })
        .await
        .map_err(storage)??;

        match bytes {
            Some(bytes) => Ok(Some(self.serializer.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, run_id: &str) -> Result<bool, CheckpointError> {
        let run_id = run_id.to_string();
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
            let n = conn
                .execute("DELETE FROM run_records WHERE run_id = ?1", params![run_id])
                .map_err(storage)?;
            Ok::<bool, CheckpointError>(n > 0)
        })
        .await
        .map_err(storage)?
    }

    async fn list(&self) -> Result<Vec<String>, CheckpointError> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
            let mut stmt = conn
                .prepare("SELECT run_id FROM run_records ORDER BY run_id")
                .map_err(storage)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(storage)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(storage)
        })
        .await
        .map_err(storage)?
    }
}
