//! The session transcript: an ordered, append-only log of chat turns.
//!
//! The transcript is the single canonical conversation history. The agent
//! derives its provider-message view from it on every invocation; nothing
//! else records turns.

use serde::{Deserialize, Serialize};

/// The greeting every session opens with.
pub const GREETING: &str = "Hi! I'm a chatbot that can search the web. How can I help you?";

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The person typing or speaking.
    User,
    /// The chatbot.
    Assistant,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One chat turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who authored this turn.
    pub role: TurnRole,
    /// The turn's text content.
    pub content: String,
}

impl ChatTurn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only log of chat turns for one session.
///
/// Seeded with the assistant greeting at construction. Entries are never
/// removed or mutated; growth is unbounded for the session's lifetime.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    /// Create a transcript seeded with the greeting turn.
    #[must_use]
    pub fn new() -> Self {
        Self {
            turns: vec![ChatTurn::assistant(GREETING)],
        }
    }

    /// Append a turn to the end of the log.
    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// The full history in insertion order.
    #[must_use]
    pub fn all(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Number of turns, including the seed greeting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// A seeded transcript is never empty; kept for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turn.
    #[must_use]
    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_is_seeded_with_greeting() {
        let transcript = Transcript::new();
        assert_eq!(transcript.len(), 1);
        let seed = &transcript.all()[0];
        assert_eq!(seed.role, TurnRole::Assistant);
        assert_eq!(seed.content, GREETING);
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.append(ChatTurn::user("first"));
        transcript.append(ChatTurn::assistant("second"));
        transcript.append(ChatTurn::user("third"));

        let turns = transcript.all();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[1].content, "first");
        assert_eq!(turns[2].content, "second");
        assert_eq!(turns[3].content, "third");
    }

    #[test]
    fn append_never_mutates_prior_entries() {
        let mut transcript = Transcript::new();
        transcript.append(ChatTurn::user("What is 2+2?"));
        let before: Vec<ChatTurn> = transcript.all().to_vec();

        transcript.append(ChatTurn::assistant("4"));

        assert_eq!(&transcript.all()[..before.len()], before.as_slice());
    }

    #[test]
    fn n_actions_give_n_plus_one_entries() {
        let mut transcript = Transcript::new();
        for i in 0..5 {
            transcript.append(ChatTurn::user(format!("question {i}")));
        }
        assert_eq!(transcript.len(), 6);
    }

    #[test]
    fn last_returns_most_recent() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.last().map(|t| t.content.as_str()), Some(GREETING));
        transcript.append(ChatTurn::user("hello"));
        assert_eq!(transcript.last().map(|t| t.content.as_str()), Some("hello"));
    }

    #[test]
    fn turn_role_display() {
        assert_eq!(TurnRole::User.to_string(), "user");
        assert_eq!(TurnRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn turn_serde_round_trip() {
        let turn = ChatTurn::user("What is 2+2?");
        let json = serde_json::to_string(&turn).expect("serialize");
        let parsed: ChatTurn = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, turn);
    }
}
