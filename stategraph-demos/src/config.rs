//! Demo config: checkpoint database path and recursion limit. Filled from env / .env.

use stategraph::{RunnableConfig, DEFAULT_RECURSION_LIMIT};

/// Error type used for config loading and the demo binaries.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoConfig {
    /// SQLite file holding run records. Defaults to `stategraph.db`.
    pub db_path: String,
    /// Node steps per `start`/`resume` call.
    pub recursion_limit: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            db_path: "stategraph.db".to_string(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl DemoConfig {
    /// Fill config from env vars. Call `dotenv::dotenv().ok()` first to pick up `.env`.
    ///
    /// `STATEGRAPH_DB_PATH` and `STATEGRAPH_RECURSION_LIMIT` are optional; a limit that is
    /// not a positive integer is an error.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let defaults = Self::default();
        let db_path = lookup("STATEGRAPH_DB_PATH").unwrap_or(defaults.db_path);
        let recursion_limit = match lookup("STATEGRAPH_RECURSION_LIMIT") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(format!(
                        "STATEGRAPH_RECURSION_LIMIT must be a positive integer, got `{}`",
                        raw
                    )
                    .into())
                }
            },
            None => defaults.recursion_limit,
        };
        Ok(Self {
            db_path,
            recursion_limit,
        })
    }

    /// Invoke config for `run_id` with this config's recursion limit.
    pub fn runnable_config(&self, run_id: Option<&str>) -> RunnableConfig {
        RunnableConfig {
            thread_id: run_id.map(ToString::to_string),
            ..RunnableConfig::default()
        }
        .with_recursion_limit(self.recursion_limit)
    }
}
