//! LLM node: read messages, call the model, append one assistant message.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::graph::{Node, NodeContext, NodeOutput};
use crate::llm::LlmClient;
use crate::message::{read_messages, MESSAGES_FIELD};
use crate::state::{State, StateUpdate};
use crate::tools::ToolSpec;

/// One model turn of a ReAct loop.
///
/// Reads the message list, calls the [`LlmClient`] with the tool specs on offer, and appends
/// the response as one assistant message (with its tool calls, if any). Routing is left to
/// the edges, typically [`tools_condition`](super::tools_condition).
pub struct LlmNode {
    llm: Arc<dyn LlmClient>,
    tools: Vec<ToolSpec>,
    messages_field: String,
}

impl LlmNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            tools: Vec::new(),
            messages_field: MESSAGES_FIELD.to_string(),
        }
    }

    /// Tool specs passed to the model on every call.
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_messages_field(mut self, field: impl Into<String>) -> Self {
        self.messages_field = field.into();
        self
    }
}

#[async_trait]
impl Node for LlmNode {
    async fn run(&self, state: State, ctx: NodeContext) -> Result<NodeOutput, NodeError> {
        let messages = read_messages(&state, &self.messages_field)?;
        let response = self.llm.invoke(&messages, &self.tools).await?;
        tracing::debug!(
            run_id = ctx.run_id(),
            tool_calls = response.tool_calls.len(),
            "llm responded"
        );
        let update = StateUpdate::new()
            .set_serialized(self.messages_field.as_str(), &response.into_message())?;
        Ok(update.into())
    }
}
