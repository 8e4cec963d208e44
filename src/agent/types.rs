//! Configuration and result types for the agent loop.

use serde::{Deserialize, Serialize};

use crate::llm::events::FinishReason;
use crate::tools::ToolResult;

/// Default maximum number of provider round-trips per run.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// Default maximum tool calls allowed in a single turn.
pub const DEFAULT_MAX_TOOL_CALLS_PER_TURN: u32 = 4;

/// Configuration for one agent run.
///
/// Controls the loop bounds and the system prompt. There is deliberately
/// no retry or backoff configuration: a failed provider request ends the
/// run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of turns (provider round-trips) before stopping.
    pub max_turns: u32,
    /// Maximum tool calls the model may request in a single turn.
    pub max_tool_calls_per_turn: u32,
    /// Optional system prompt prepended to the conversation.
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            max_tool_calls_per_turn: DEFAULT_MAX_TOOL_CALLS_PER_TURN,
            system_prompt: None,
        }
    }
}

impl AgentConfig {
    /// Create a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of turns.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set the maximum tool calls per turn.
    #[must_use]
    pub fn with_max_tool_calls_per_turn(mut self, max: u32) -> Self {
        self.max_tool_calls_per_turn = max;
        self
    }

    /// Set the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// A tool call that was executed during the loop.
#[derive(Debug, Clone)]
pub struct ExecutedToolCall {
    /// The unique call ID from the model.
    pub call_id: String,
    /// The function name that was called.
    pub function_name: String,
    /// The parsed arguments (`Null` when the model sent malformed JSON).
    pub arguments: serde_json::Value,
    /// The tool execution result.
    pub result: ToolResult,
}

/// The result of a single turn: one provider round-trip plus any tool
/// executions it requested.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// Text generated by the model in this turn.
    pub text: String,
    /// Tool calls executed in this turn.
    pub tool_calls: Vec<ExecutedToolCall>,
    /// Why the model stopped generating in this turn.
    pub finish_reason: FinishReason,
}

/// Why the agent loop stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The model completed its response naturally.
    Complete,
    /// The maximum number of turns was reached.
    MaxTurns,
    /// Too many tool calls in a single turn.
    MaxToolCalls,
    /// An error occurred during the loop.
    Error(String),
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::MaxTurns => write!(f, "max_turns"),
            Self::MaxToolCalls => write!(f, "max_tool_calls"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// The complete result of an agent run.
#[derive(Debug, Clone)]
pub struct AgentRunResult {
    /// All turns executed during the run.
    pub turns: Vec<TurnResult>,
    /// The final text output (from the last turn with text).
    pub final_text: String,
    /// Why the run stopped.
    pub stop_reason: StopReason,
}
