//! # sibyl-search
//!
//! Embedded retrieval engines for Sibyl — no API keys, no external services.
//!
//! This crate provides the three retrieval capabilities the chatbot's agent
//! can be scoped to: DuckDuckGo web search, Arxiv paper lookup, and
//! Wikipedia article lookup. It compiles into Sibyl's binary as a library
//! dependency.
//!
//! ## Design
//!
//! - Exactly one engine is queried per call — selecting a source replaces,
//!   never augments, the engine in use
//! - DuckDuckGo is scraped via CSS selectors on the HTML-only endpoint;
//!   Arxiv and Wikipedia use their public query APIs
//! - Every engine caps results at `top_k_results` and truncates snippet
//!   text to `snippet_chars_max` characters
//! - User-Agent rotation for the scraped engine
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - No network listeners — this is a library, not a server
//! - Search queries are logged only at trace level

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod types;

pub use config::SearchConfig;
pub use engine::Engine;
pub use error::{Result, SearchError};
pub use types::{Snippet, SourceKind};

use engines::{ArxivEngine, DuckDuckGoEngine, WikipediaEngine};

/// Query a single retrieval source.
///
/// Dispatches to the engine for `kind`, validates the config first, and
/// returns up to `config.top_k_results` snippets.
///
/// # Errors
///
/// Returns [`SearchError`] if the config is invalid, the HTTP request
/// fails, or the response cannot be parsed.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> sibyl_search::Result<()> {
/// let config = sibyl_search::SearchConfig::default();
/// let results =
///     sibyl_search::search(sibyl_search::SourceKind::Wikipedia, "rust language", &config).await?;
/// for snippet in &results {
///     println!("{}: {}", snippet.title, snippet.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(kind: SourceKind, query: &str, config: &SearchConfig) -> Result<Vec<Snippet>> {
    config.validate()?;
    match kind {
        SourceKind::DuckDuckGo => DuckDuckGoEngine.search(query, config).await,
        SourceKind::Arxiv => ArxivEngine.search(query, config).await,
        SourceKind::Wikipedia => WikipediaEngine.search(query, config).await,
    }
}
