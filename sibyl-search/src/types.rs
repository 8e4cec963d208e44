//! Core types for retrieval results and source identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single retrieval result returned by an engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    /// The title of the result (page title, paper title, article title).
    pub title: String,
    /// The canonical URL of the result.
    pub url: String,
    /// A text excerpt summarising the result, capped at the configured
    /// character limit.
    pub text: String,
    /// Which retrieval source produced this snippet.
    pub source: String,
}

/// The retrieval backends sibyl-search can query.
///
/// Each variant maps to exactly one engine implementation; there is no
/// merged multi-source mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// DuckDuckGo HTML search — scraper-friendly general web search.
    DuckDuckGo,
    /// Arxiv — paper lookup via the export query API.
    Arxiv,
    /// Wikipedia — article lookup via the MediaWiki search API.
    Wikipedia,
}

impl SourceKind {
    /// Returns the human-readable name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Arxiv => "Arxiv",
            Self::Wikipedia => "Wikipedia",
        }
    }

    /// Returns all available source variants.
    pub fn all() -> &'static [SourceKind] {
        &[Self::DuckDuckGo, Self::Arxiv, Self::Wikipedia]
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Truncate a string to at most `max_chars` characters, on a char boundary.
///
/// Mirrors the per-snippet content cap every engine applies before
/// returning results.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}
