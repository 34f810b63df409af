//! Approval demo: `start` suspends on a review step and exits; `resume` in a later process
//! finishes the run from the SQLite checkpoint.
//!
//! ```text
//! approval start --request "deploy v2"
//! approval resume --run-id <id> --decision yes
//! approval continue --run-id <id>
//! approval show --run-id <id>
//! ```

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use stategraph::{SqliteSaver, StateUpdate};
use stategraph_demos::{approval_graph, init_tracing, log_outcome, DemoConfig, Error};

#[derive(Parser, Debug)]
#[command(name = "approval")]
#[command(about = "Human-in-the-loop approval with runs persisted in SQLite")]
struct Args {
    /// SQLite file; overrides STATEGRAPH_DB_PATH.
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a run; it suspends waiting for a decision.
    Start {
        #[arg(long, default_value = "deploy")]
        request: String,
        /// Run id to use instead of a generated one.
        #[arg(long)]
        run_id: Option<String>,
    },
    /// Resume a suspended run with a decision (`yes` approves).
    Resume {
        #[arg(long)]
        run_id: String,
        #[arg(long)]
        decision: String,
    },
    /// Continue a run left mid-flight by a crash or a failed checkpoint write.
    Continue {
        #[arg(long)]
        run_id: String,
    },
    /// Print the stored record of a run.
    Show {
        #[arg(long)]
        run_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    let mut config = DemoConfig::from_env()?;
    if let Some(db) = args.db {
        config.db_path = db;
    }

    let saver = Arc::new(SqliteSaver::new(&config.db_path)?);
    let graph = approval_graph(saver)?;

    match args.command {
        Command::Start { request, run_id } => {
            let result = graph
                .start_with_config(
                    StateUpdate::new().set("request", request),
                    config.runnable_config(run_id.as_deref()),
                )
                .await?;
            log_outcome(&result.run_id, &result.outcome);
        }
        Command::Resume { run_id, decision } => {
            let outcome = graph
                .resume_with_config(
                    config.runnable_config(Some(&run_id)),
                    json!({ "decision": decision }),
                )
                .await?;
            log_outcome(&run_id, &outcome);
        }
        Command::Continue { run_id } => {
            let outcome = graph
                .continue_with_config(config.runnable_config(Some(&run_id)))
                .await?;
            log_outcome(&run_id, &outcome);
        }
        Command::Show { run_id } => {
            let record = graph.get_run(&run_id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}
