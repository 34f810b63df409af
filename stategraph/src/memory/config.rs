//! Invoke config: thread (run) id, user id and recursion limit.
//!
//! Passed to `CompiledStateGraph::start_with_config` / `resume_with_config`; a copy reaches
//! every node through `NodeContext::config`.

/// Default maximum number of node steps per invocation.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Config for a single invocation. Identifies the run and bounds its length.
///
/// **Interaction**: Passed to `CompiledStateGraph::start_with_config(input, config)` and
/// `resume_with_config(config, value)`; `thread_id` is the key under which the
/// [`Checkpointer`](super::Checkpointer) stores the run record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnableConfig {
    /// Run/thread id. `start` generates one when unset; `resume` requires it.
    pub thread_id: Option<String>,
    /// Caller identity, for nodes that scope data per user. Not used by the engine.
    pub user_id: Option<String>,
    /// Maximum node steps executed by one `start` or `resume` call.
    pub recursion_limit: usize,
}

impl Default for RunnableConfig {
    fn default() -> Self {
        Self {
            thread_id: None,
            user_id: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl RunnableConfig {
    /// Config addressing an existing or new run id.
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Self::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }
}
