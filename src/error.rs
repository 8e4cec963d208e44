//! Error types for the sibyl chat core.

/// Top-level error type for the chat system.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Missing or unresolvable API credential.
    #[error("credential error: {0}")]
    Credential(String),

    /// Language model provider error (request, auth, stream).
    #[error("LLM error: {0}")]
    Llm(String),

    /// Agent loop error.
    #[error("agent error: {0}")]
    Agent(String),

    /// Retrieval tool error.
    #[error("tool error: {0}")]
    Tool(String),

    /// Microphone capture or audio encoding error.
    #[error("voice error: {0}")]
    Voice(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Event channel error.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_subsystem_prefix() {
        assert_eq!(
            ChatError::Llm("bad gateway".into()).to_string(),
            "LLM error: bad gateway"
        );
        assert_eq!(
            ChatError::Voice("no input device".into()).to_string(),
            "voice error: no input device"
        );
        assert_eq!(
            ChatError::Config("missing model".into()).to_string(),
            "config error: missing model"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ChatError = io.into();
        assert!(matches!(err, ChatError::Io(_)));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChatError>();
    }
}
