//! Sibyl: a voice-enabled search chatbot core.
//!
//! One session owns an append-only transcript seeded with a greeting.
//! Each user action (typed text or voice-derived text) runs one
//! orchestrated agent invocation:
//!
//! Transcript → LLM-backed agent (scoped to ONE retrieval tool) → answer
//! appended as a new assistant turn.
//!
//! # Architecture
//!
//! - **Retrieval engines**: DuckDuckGo, Arxiv, Wikipedia via the
//!   `sibyl-search` member crate
//! - **Tool registry**: maps the user's source selection to exactly one tool
//! - **LLM provider**: Groq chat-completions over SSE streaming
//! - **Agent**: bounded tool-calling loop with tolerant argument parsing
//! - **Voice**: blocking microphone capture with fail-soft HTTP
//!   transcription
//! - **Orchestrator**: builds everything fresh per request; the transcript
//!   is the only state that persists across invocations

pub mod agent;
pub mod config;
pub mod credentials;
pub mod error;
pub mod events;
pub mod llm;
pub mod orchestrator;
pub mod session;
pub mod tools;
pub mod transcript;
pub mod voice;

pub use config::ChatConfig;
pub use credentials::CredentialRef;
pub use error::{ChatError, Result};
pub use events::ChatEvent;
pub use orchestrator::Orchestrator;
pub use session::SessionContext;
pub use tools::ToolSelection;
pub use transcript::{ChatTurn, Transcript, TurnRole, GREETING};
