//! Trait definition for pluggable retrieval backends.
//!
//! Each backend (DuckDuckGo, Arxiv, Wikipedia) implements [`Engine`] to
//! provide a uniform interface for querying and parsing results.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{Snippet, SourceKind};

/// A pluggable retrieval backend.
///
/// Implementors query a specific source and extract structured [`Snippet`]
/// values. Each engine handles its own:
///
/// - URL construction with query encoding
/// - HTTP request with appropriate headers
/// - Response parsing (CSS selectors for HTML/Atom, serde for JSON)
/// - Result capping and snippet truncation per the config
///
/// All implementations must be `Send + Sync` so a registry can hold them
/// behind shared references.
pub trait Engine: Send + Sync {
    /// Perform a query and return parsed snippets.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails or the response
    /// cannot be parsed.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<Snippet>, SearchError>> + Send;

    /// Returns which [`SourceKind`] this implementation queries.
    fn kind(&self) -> SourceKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockEngine {
        kind: SourceKind,
        snippets: Vec<Snippet>,
    }

    impl Engine for MockEngine {
        async fn search(
            &self,
            _query: &str,
            _config: &SearchConfig,
        ) -> Result<Vec<Snippet>, SearchError> {
            if self.snippets.is_empty() {
                return Err(SearchError::Parse("mock engine failure".into()));
            }
            Ok(self.snippets.clone())
        }

        fn kind(&self) -> SourceKind {
            self.kind
        }
    }

    #[test]
    fn mock_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockEngine>();
    }

    #[tokio::test]
    async fn mock_engine_returns_snippets() {
        let engine = MockEngine {
            kind: SourceKind::Wikipedia,
            snippets: vec![Snippet {
                title: "Test".into(),
                url: "https://test.com".into(),
                text: "a test result".into(),
                source: "Wikipedia".into(),
            }],
        };
        let results = engine.search("test", &SearchConfig::default()).await;
        let results = results.expect("should succeed");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Test");
    }

    #[tokio::test]
    async fn mock_engine_propagates_errors() {
        let engine = MockEngine {
            kind: SourceKind::Arxiv,
            snippets: vec![],
        };
        let result = engine.search("test", &SearchConfig::default()).await;
        assert!(result.is_err());
    }

    #[test]
    fn kind_returns_correct_variant() {
        let engine = MockEngine {
            kind: SourceKind::DuckDuckGo,
            snippets: vec![],
        };
        assert_eq!(engine.kind(), SourceKind::DuckDuckGo);
    }
}
