//! Prebuilt ReAct nodes: model turn, tool execution, and the router between them.
//!
//! Wire them as `START -> llm`, `llm -> (tool | END)` via [`tools_condition`], `tool -> llm`.
//! Both nodes read and write a `messages` APPEND field holding [`Message`](crate::Message)
//! values.

mod condition;
mod llm_node;
mod tool_node;

pub use condition::{tools_condition, TOOLS_LABEL};
pub use llm_node::LlmNode;
pub use tool_node::{
    ErrorHandlerFn, HandleToolErrors, ToolNode, DEFAULT_EXECUTION_ERROR_TEMPLATE,
};
