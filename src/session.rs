//! Explicit session context.
//!
//! One [`SessionContext`] owns everything that lives for the duration of
//! one interactive session: the transcript, the current tool selection,
//! and the API credential. It is created at session start, passed by
//! reference into every handler, and dropped at session end. Nothing is
//! shared across sessions.

use crate::config::ChatConfig;
use crate::credentials::CredentialRef;
use crate::tools::ToolSelection;
use crate::transcript::{ChatTurn, Transcript};

/// Per-session mutable state.
#[derive(Debug)]
pub struct SessionContext {
    /// The append-only conversation log, seeded with the greeting.
    pub transcript: Transcript,
    /// The currently selected retrieval source. No history of past
    /// selections is kept.
    pub selection: ToolSelection,
    /// The provider API key for this session.
    pub credential: CredentialRef,
    /// Static configuration the session was started with.
    pub config: ChatConfig,
}

impl SessionContext {
    /// Start a session: fresh transcript, default tool selection, and the
    /// credential taken from the config file (interactive input replaces
    /// it via [`set_credential`](Self::set_credential)).
    #[must_use]
    pub fn new(config: ChatConfig) -> Self {
        let credential = config.llm.api_key.clone();
        Self {
            transcript: Transcript::new(),
            selection: ToolSelection::default(),
            credential,
            config,
        }
    }

    /// Record a typed or voice-derived user utterance.
    pub fn push_user_turn(&mut self, content: impl Into<String>) {
        self.transcript.append(ChatTurn::user(content));
    }

    /// Switch the active retrieval source. Takes effect on the next
    /// orchestrator invocation; past transcript entries are untouched.
    pub fn select_tool(&mut self, selection: ToolSelection) {
        self.selection = selection;
    }

    /// Replace the session credential with an interactively supplied key.
    pub fn set_credential(&mut self, credential: CredentialRef) {
        self.credential = credential;
    }

    /// Whether the key-present precondition for invoking the orchestrator
    /// holds. The presentation layer checks this before each request.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential.is_present()
    }
}
