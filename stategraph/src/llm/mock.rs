//! Scripted LLM client for tests and demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::message::Message;
use crate::tools::ToolSpec;

use super::{LlmClient, LlmResponse};

/// Mock LLM: returns scripted responses in order, one per call.
///
/// When the script runs out, every further call fails with `NodeError::Llm`, which makes an
/// unexpected extra model turn visible as a failed run.
#[derive(Debug, Default)]
pub struct MockLlm {
    script: Mutex<VecDeque<LlmResponse>>,
}

impl MockLlm {
    pub fn new(script: impl IntoIterator<Item = LlmResponse>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Responses not yet returned.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        _messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<LlmResponse, NodeError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| NodeError::Llm("mock script lock poisoned".into()))?;
        script
            .pop_front()
            .ok_or_else(|| NodeError::Llm("mock script exhausted".into()))
    }
}
