//! Tools callable by name from graph nodes.
//!
//! A [`Tool`] exposes a [`ToolSpec`] and an async `call`. Tools are registered explicitly in
//! a [`ToolRegistry`]; calling an unregistered name is the distinct
//! [`ToolError::NotFound`], never a panic. Tool bodies are supplied by the caller.

mod registry;

pub use registry::ToolRegistry;

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error from tool lookup or execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    /// No tool with this name is registered.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// A tool with this name is already registered.
    #[error("tool already registered: {0}")]
    Duplicate(String),

    /// Arguments did not match what the tool expects.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool ran and failed.
    #[error("execution failed: {0}")]
    Execution(String),
}

/// Name, description and JSON schema of a tool's arguments, as shown to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// A callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;

    /// Runs the tool; the result text becomes the content of a tool message.
    async fn call(&self, arguments: Value) -> Result<String, ToolError>;
}

type ToolFuture = Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send>>;
type ToolFn = dyn Fn(Value) -> ToolFuture + Send + Sync;

/// Tool built from a spec and an async closure.
pub struct FnTool {
    spec: ToolSpec,
    f: Box<ToolFn>,
}

impl FnTool {
    pub fn new<F, Fut>(spec: ToolSpec, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        Self {
            spec,
            f: Box::new(move |args: Value| -> ToolFuture { Box::pin(f(args)) }),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    async fn call(&self, arguments: Value) -> Result<String, ToolError> {
        (self.f)(arguments).await
    }
}
