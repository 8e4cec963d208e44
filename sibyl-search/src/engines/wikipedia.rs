//! Wikipedia article lookup via the MediaWiki search API.
//!
//! Queries `https://en.wikipedia.org/w/api.php` with `action=query&list=search`
//! and returns article titles plus cleaned snippet text. Match highlighting
//! markup (`<span class="searchmatch">`) is stripped before returning.

use crate::config::SearchConfig;
use crate::engine::Engine;
use crate::error::SearchError;
use crate::http;
use crate::types::{truncate_chars, Snippet, SourceKind};
use scraper::Html;
use serde::Deserialize;
use url::Url;

const WIKIPEDIA_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
const WIKIPEDIA_ARTICLE_BASE: &str = "https://en.wikipedia.org/wiki/";

/// Wikipedia MediaWiki API engine.
pub struct WikipediaEngine;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    query: Option<QuerySection>,
}

#[derive(Debug, Deserialize)]
struct QuerySection {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

impl Engine for WikipediaEngine {
    async fn search(&self, query: &str, config: &SearchConfig) -> Result<Vec<Snippet>, SearchError> {
        tracing::trace!(query, "Wikipedia search");

        let client = http::build_client(config)?;
        let srlimit = config.top_k_results.to_string();

        let endpoint = config.base_url.as_deref().unwrap_or(WIKIPEDIA_ENDPOINT);
        let response = client
            .get(endpoint)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", srlimit.as_str()),
                ("format", "json"),
                ("utf8", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Wikipedia request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Wikipedia HTTP error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("Wikipedia response read failed: {e}")))?;

        tracing::trace!(bytes = body.len(), "Wikipedia response received");

        parse_wikipedia_response(&body, config)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Wikipedia
    }
}

/// Parse a MediaWiki search API JSON response into snippets.
///
/// Extracted as a separate function for testability with fixture JSON.
pub(crate) fn parse_wikipedia_response(
    body: &str,
    config: &SearchConfig,
) -> Result<Vec<Snippet>, SearchError> {
    let parsed: ApiResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Wikipedia JSON invalid: {e}")))?;

    let hits = parsed.query.map(|q| q.search).unwrap_or_default();

    let mut snippets = Vec::new();
    for hit in hits.into_iter().take(config.top_k_results) {
        let text = strip_markup(&hit.snippet);
        let url = article_url(&hit.title);

        snippets.push(Snippet {
            title: hit.title,
            url,
            text: truncate_chars(&text, config.snippet_chars_max),
            source: SourceKind::Wikipedia.name().to_string(),
        });
    }

    tracing::debug!(count = snippets.len(), "Wikipedia results parsed");
    Ok(snippets)
}

/// Strip search-match highlighting and any other inline markup from a snippet.
fn strip_markup(snippet: &str) -> String {
    let fragment = Html::parse_fragment(snippet);
    fragment.root_element().text().collect::<String>()
}

/// Build the canonical article URL for a page title.
fn article_url(title: &str) -> String {
    let slug = title.replace(' ', "_");
    Url::parse(WIKIPEDIA_ARTICLE_BASE)
        .and_then(|base| base.join(&slug))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("{WIKIPEDIA_ARTICLE_BASE}{slug}"))
}
