//! LLM provider layer.
//!
//! Normalizes the chat-completions wire format into an event stream the
//! agent can drive. The only production backend is Groq; tests substitute
//! stub providers behind the same trait.

pub mod events;
pub mod groq;
pub mod message;
pub mod provider;
pub mod sse;

pub use events::{FinishReason, LlmEvent};
pub use groq::{GroqClient, GroqConfig};
pub use message::{AssistantToolCall, Message, MessageContent, Role};
pub use provider::{ChatProvider, LlmEventStream, RequestOptions, ToolDefinition};
