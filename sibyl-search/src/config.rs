//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls result counts, snippet length, and request
//! behaviour. The defaults match the chatbot's tool contract: one result
//! per query, snippets capped at 200 characters.

use crate::error::SearchError;

/// Configuration for a retrieval operation.
///
/// Use [`Default::default()`] for the standard tool behaviour, or
/// construct with field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of results to return from a query.
    pub top_k_results: usize,
    /// Per-snippet character cap applied to result text.
    pub snippet_chars_max: usize,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to request safe search filtering from engines that support it.
    pub safe_search: bool,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Override the engine base URL. Used by tests to point an engine at a
    /// local mock server; `None` targets the real backend.
    pub base_url: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k_results: 1,
            snippet_chars_max: 200,
            timeout_seconds: 8,
            safe_search: true,
            user_agent: None,
            base_url: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.top_k_results == 0 {
            return Err(SearchError::Config(
                "top_k_results must be greater than 0".into(),
            ));
        }
        if self.snippet_chars_max == 0 {
            return Err(SearchError::Config(
                "snippet_chars_max must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
