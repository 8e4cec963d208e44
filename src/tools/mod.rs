//! Retrieval tools exposed to the agent.
//!
//! Defines the [`Tool`] trait the agent loop executes against, plus the
//! registry that maps the user's source selection to exactly one tool.

pub mod registry;
pub mod retrieval;

pub use registry::{ToolRegistry, ToolSelection};
pub use retrieval::RetrievalTool;

use crate::error::ChatError;

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Whether the tool execution succeeded.
    pub success: bool,
    /// Output content.
    pub content: String,
    /// Error message if the tool execution failed.
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful tool result.
    pub fn success(content: String) -> Self {
        Self {
            success: true,
            content,
            error: None,
        }
    }

    /// Create a failed tool result with an error message.
    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(error),
        }
    }
}

/// Core trait for agent tools.
///
/// All tools are `Send + Sync`; the agent loop runs `execute` on a
/// blocking thread, so implementations may bridge to async work with
/// `Handle::current().block_on`.
pub trait Tool: Send + Sync {
    /// Returns the tool name the model calls it by.
    fn name(&self) -> &str;

    /// Returns a human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's arguments.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError`] for validation or execution failures.
    fn execute(&self, args: serde_json::Value) -> std::result::Result<ToolResult, ChatError>;
}
