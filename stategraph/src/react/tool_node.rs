//! Tool node: execute the tool calls of the last assistant message, append tool messages.
//!
//! By default a failing tool call fails the node (and the run). Use
//! [`ToolNode::with_handle_tool_errors`] to turn failures into tool messages the model can
//! read instead.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::NodeError;
use crate::graph::{Node, NodeContext, NodeOutput};
use crate::message::{read_messages, Message, MESSAGES_FIELD};
use crate::state::{State, StateUpdate};
use crate::tools::{ToolError, ToolRegistry};

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Default message template for a handled tool error.
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with arguments {tool_args}: {error}. Please fix the error and try again.";

/// Error handler: (error, tool name, arguments) to the tool message content.
pub type ErrorHandlerFn = Arc<dyn Fn(&ToolError, &str, &Value) -> String + Send + Sync + 'static>;

/// How [`ToolNode`] handles a failing tool call.
#[derive(Clone, Default)]
pub enum HandleToolErrors {
    /// The error fails the node (default).
    #[default]
    Never,
    /// The error becomes the tool message; `None` uses [`DEFAULT_EXECUTION_ERROR_TEMPLATE`].
    Always(Option<String>),
    Custom(ErrorHandlerFn),
}

impl fmt::Debug for HandleToolErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "HandleToolErrors::Never"),
            Self::Always(msg) => write!(f, "HandleToolErrors::Always({:?})", msg),
            Self::Custom(_) => write!(f, "HandleToolErrors::Custom(<fn>)"),
        }
    }
}

/// Executes the tool calls of the last assistant message, in order, through a
/// [`ToolRegistry`], and appends one tool message per call.
///
/// An unknown tool name is `ToolError::NotFound` and is handled like any other tool error.
pub struct ToolNode {
    tools: Arc<ToolRegistry>,
    handle_tool_errors: HandleToolErrors,
    messages_field: String,
}

impl ToolNode {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self {
            tools,
            handle_tool_errors: HandleToolErrors::Never,
            messages_field: MESSAGES_FIELD.to_string(),
        }
    }

    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    pub fn with_messages_field(mut self, field: impl Into<String>) -> Self {
        self.messages_field = field.into();
        self
    }

    /// Message content for a handled error, or `None` when the error should propagate.
    fn handle_error(&self, error: &ToolError, tool_name: &str, args: &Value) -> Option<String> {
        match &self.handle_tool_errors {
            HandleToolErrors::Never => None,
            HandleToolErrors::Always(custom) => Some(custom.clone().unwrap_or_else(|| {
                DEFAULT_EXECUTION_ERROR_TEMPLATE
                    .replace("{tool_name}", tool_name)
                    .replace("{tool_args}", &args.to_string())
                    .replace("{error}", &error.to_string())
            })),
            HandleToolErrors::Custom(handler) => Some(handler(error, tool_name, args)),
        }
    }
}

#[async_trait]
impl Node for ToolNode {
    async fn run(&self, state: State, ctx: NodeContext) -> Result<NodeOutput, NodeError> {
        let messages = read_messages(&state, &self.messages_field)?;
        let calls = messages
            .last()
            .map(|m| m.tool_calls().to_vec())
            .unwrap_or_default();

        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            debug!(run_id = ctx.run_id(), tool = %call.name, args = %call.arguments, "Calling tool");
            let content = match self.tools.call(&call.name, call.arguments.clone()).await {
                Ok(text) => {
                    trace!(
                        tool = %call.name,
                        result_len = text.len(),
                        result_preview = %truncate_for_log(&text, 200),
                        "Tool returned"
                    );
                    text
                }
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "Tool call failed");
                    match self.handle_error(&e, &call.name, &call.arguments) {
                        Some(msg) => msg,
                        None => return Err(e.into()),
                    }
                }
            };
            results.push(Message::tool(call.id.clone(), call.name.clone(), content));
        }

        if results.is_empty() {
            return Ok(NodeOutput::default());
        }
        let update = StateUpdate::new().set_serialized(self.messages_field.as_str(), &results)?;
        Ok(update.into())
    }
}
