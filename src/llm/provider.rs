//! Provider trait for the chat-completions backend.
//!
//! The agent drives any [`ChatProvider`]; production uses the Groq
//! adapter, tests substitute deterministic stubs.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};

use super::events::LlmEvent;
use super::message::Message;
use crate::error::ChatError;

/// A tool definition handed to the model for function calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name (e.g. `"wikipedia"`).
    pub name: String,
    /// Human-readable description of the tool's purpose.
    pub description: String,
    /// JSON Schema describing the tool's parameters.
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Options controlling one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Maximum tokens to generate. `None` means provider default.
    pub max_tokens: Option<usize>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Whether to stream the response. Always true in this system; kept
    /// explicit because the request body must carry it.
    pub stream: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            max_tokens: Some(1024),
            temperature: Some(0.7),
            stream: true,
        }
    }
}

impl RequestOptions {
    /// Create request options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A boxed stream of normalized LLM events.
pub type LlmEventStream = Pin<Box<dyn Stream<Item = LlmEvent> + Send>>;

/// Trait for chat-completions providers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Returns the provider name (e.g. `"groq"`).
    fn name(&self) -> &str;

    /// Send a conversation and receive a normalized event stream.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Llm`] if the request cannot be sent or the
    /// provider rejects it. Mid-stream failures surface as
    /// [`LlmEvent::StreamError`] items instead.
    async fn send(
        &self,
        messages: &[Message],
        options: &RequestOptions,
        tools: &[ToolDefinition],
    ) -> Result<LlmEventStream, ChatError>;
}
