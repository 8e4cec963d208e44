//! Error types for the sibyl-search crate.
//!
//! All errors carry stable string messages suitable for display to users.
//! No credentials or sensitive data appear in error messages (none of the
//! engines require any).

/// Errors that can occur during retrieval operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to a retrieval backend failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a backend response (HTML, Atom, or JSON).
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for sibyl-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("unexpected response structure".into());
        assert_eq!(err.to_string(), "parse error: unexpected response structure");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("top_k_results must be > 0".into());
        assert_eq!(err.to_string(), "config error: top_k_results must be > 0");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
