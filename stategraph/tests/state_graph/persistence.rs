//! Runs checkpointed in SQLite survive a "restart" between suspend and resume.

use std::sync::Arc;

use serde_json::json;
use stategraph::{Checkpointer, RunStatus, SqliteSaver, StateUpdate};

use crate::common::{approval_graph, final_of};

/// **Scenario**: A run suspended by one compiled graph is resumed by a fresh graph and
/// saver opened on the same database file.
#[tokio::test]
async fn suspended_run_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("runs.db");

    let run_id = {
        let graph = approval_graph(Arc::new(SqliteSaver::new(&db).unwrap()));
        let started = graph.start(StateUpdate::new()).await.unwrap();
        assert!(started.outcome.interrupt().is_some());
        started.run_id
    };

    let graph = approval_graph(Arc::new(SqliteSaver::new(&db).unwrap()));
    let record = graph.get_run(&run_id).await.unwrap();
    assert_eq!(record.status, RunStatus::Suspended);
    assert_eq!(
        record.interrupt.map(|i| i.payload),
        Some(json!({"question": "approve?"}))
    );

    let done = graph
        .resume(&run_id, json!({"decision": "yes"}))
        .await
        .unwrap();
    assert_eq!(final_of(done.state().unwrap()), Some(json!("approved")));

    let saver = SqliteSaver::new(&db).unwrap();
    let stored = saver.load(&run_id).await.unwrap().unwrap();
    assert_eq!(stored.status, RunStatus::Completed);
    assert_eq!(final_of(&stored.state), Some(json!("approved")));
    assert_eq!(saver.list().await.unwrap(), vec![run_id]);
}
