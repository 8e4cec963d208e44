//! The conversation orchestrator.
//!
//! One [`handle`](Orchestrator::handle) call per user action: build a
//! fresh provider and single-tool agent from the session state, run the
//! agent over the full transcript, and append its answer as a new
//! assistant turn. The orchestrator keeps no state of its own between
//! invocations — the transcript is the only persistent record.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::agent::{messages_from_transcript, AgentConfig, AgentLoop, StopReason};
use crate::error::{ChatError, Result};
use crate::events::{emit, ChatEvent};
use crate::llm::{GroqClient, GroqConfig};
use crate::session::SessionContext;
use crate::tools::{ToolRegistry, ToolSelection};
use crate::transcript::ChatTurn;

/// Build the system prompt for the active tool selection.
#[must_use]
pub fn system_prompt_for(selection: ToolSelection) -> String {
    format!(
        "You are Sibyl, a chatbot that can look things up. When a question \
         needs outside information, call the {} tool with a focused query, \
         then answer from the results. Answer directly when no lookup is needed.",
        match selection {
            ToolSelection::Search => "search",
            ToolSelection::Arxiv => "arxiv",
            ToolSelection::Wikipedia => "wikipedia",
        }
    )
}

/// Per-session orchestrator.
#[derive(Default)]
pub struct Orchestrator {
    events_tx: Option<broadcast::Sender<ChatEvent>>,
}

impl Orchestrator {
    /// Create an orchestrator with no event channel attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an event channel for live display.
    #[must_use]
    pub fn with_events(mut self, tx: broadcast::Sender<ChatEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    /// Handle one user action: produce and append the assistant's reply.
    ///
    /// Precondition: the caller has verified a credential is present
    /// ([`SessionContext::has_credential`]). The orchestrator does not
    /// check; a missing key surfaces as the provider's own auth failure.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Agent`] when the agent run ends in an error
    /// (provider failure, auth rejection, stream error). The transcript
    /// is left unchanged in that case.
    pub async fn handle(&self, session: &mut SessionContext) -> Result<ChatTurn> {
        let llm = &session.config.llm;
        let provider = GroqClient::new(
            GroqConfig::new(session.credential.resolve_plaintext(), llm.api_model.clone())
                .with_base_url(llm.api_url.clone()),
        );

        let registry = ToolRegistry::for_selection(
            session.selection,
            session.config.search.to_search_config(),
        );

        let agent_config = AgentConfig::new().with_system_prompt(system_prompt_for(session.selection));
        let mut agent = AgentLoop::new(agent_config, Arc::new(provider), Arc::new(registry));
        if let Some(tx) = &self.events_tx {
            agent = agent.with_events(tx.clone());
        }

        tracing::info!(
            tool = %session.selection,
            model = %llm.api_model,
            turns = session.transcript.len(),
            "handling user action"
        );

        emit(self.events_tx.as_ref(), ChatEvent::Generating { active: true });
        let messages = messages_from_transcript(&session.transcript, None);
        let run = agent.run(messages).await;
        emit(self.events_tx.as_ref(), ChatEvent::Generating { active: false });

        let result = run?;
        match result.stop_reason {
            StopReason::Error(message) => Err(ChatError::Agent(message)),
            StopReason::Complete | StopReason::MaxTurns | StopReason::MaxToolCalls => {
                let turn = ChatTurn::assistant(result.final_text);
                session.transcript.append(turn.clone());
                Ok(turn)
            }
        }
    }
}
