//! # Memory: run records and checkpointers
//!
//! The run loop persists one [`RunRecord`] per run id through a [`Checkpointer`] after every
//! node and on every interrupt. A run suspended in one process can be resumed by another as
//! long as both use the same persistent backend.
//!
//! ## Config
//!
//! [`RunnableConfig`] is passed to `CompiledStateGraph::start_with_config` /
//! `resume_with_config`:
//! - `thread_id`: the run id; generated on start when unset, required on resume.
//! - `recursion_limit`: maximum node steps per invocation.
//!
//! ## Checkpointer Implementations
//!
//! | Type             | Persistence | Use case                | Feature  |
//! |------------------|-------------|-------------------------|----------|
//! | [`MemorySaver`]  | In-memory   | Dev, tests              | -        |
//! | `SqliteSaver`    | SQLite file | Survives restarts       | `sqlite` |

mod checkpoint;
mod checkpointer;
mod config;
mod memory_saver;
mod serializer;

#[cfg(feature = "sqlite")]
mod sqlite_saver;

pub use checkpoint::{Interrupt, RunRecord, RunStatus};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::{RunnableConfig, DEFAULT_RECURSION_LIMIT};
pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};

#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;
