//! LLM client abstraction for the prebuilt [`LlmNode`](crate::react::LlmNode).
//!
//! The transport to a real model is out of scope for the engine; callers implement
//! [`LlmClient`] over whatever API they use. [`MockLlm`] replays a fixed script for tests and
//! demos.

mod mock;

pub use mock::MockLlm;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::message::{Message, ToolCall};
use crate::tools::ToolSpec;

/// Response from one completion: assistant text and optional tool calls.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; `LlmNode` appends it to the message
/// list as one assistant message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    /// Tool calls requested this turn; empty means the model answered directly.
    pub tool_calls: Vec<ToolCall>,
}

impl LlmResponse {
    /// Plain text answer with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Response requesting the given tool calls.
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            tool_calls: calls,
        }
    }

    pub fn into_message(self) -> Message {
        Message::Assistant {
            content: self.content,
            tool_calls: self.tool_calls,
        }
    }
}

/// LLM client: given messages (and the tools on offer), returns the next assistant turn.
///
/// Failures surface as node errors (`NodeError::Llm`) and fail the run; the engine never
/// retries.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, NodeError>;
}
