//! Arxiv paper lookup via the export query API.
//!
//! Queries `https://export.arxiv.org/api/query` and extracts entries from
//! the Atom feed. The feed is parsed with the same lenient selector-based
//! parser used for engine HTML: the `<entry>`, `<title>`, `<summary>`,
//! and `<id>` elements survive HTML tree construction intact, nested
//! where the feed put them.

use crate::config::SearchConfig;
use crate::engine::Engine;
use crate::error::SearchError;
use crate::http;
use crate::types::{truncate_chars, Snippet, SourceKind};
use scraper::{Html, Selector};

const ARXIV_ENDPOINT: &str = "https://export.arxiv.org/api/query";

/// Arxiv export API engine.
pub struct ArxivEngine;

impl Engine for ArxivEngine {
    async fn search(&self, query: &str, config: &SearchConfig) -> Result<Vec<Snippet>, SearchError> {
        tracing::trace!(query, "Arxiv search");

        let client = http::build_client(config)?;
        let search_query = format!("all:{query}");
        let max_results = config.top_k_results.to_string();

        let endpoint = config.base_url.as_deref().unwrap_or(ARXIV_ENDPOINT);
        let response = client
            .get(endpoint)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Arxiv request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Arxiv HTTP error: {e}")))?;

        let feed = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("Arxiv response read failed: {e}")))?;

        tracing::trace!(bytes = feed.len(), "Arxiv response received");

        parse_arxiv_feed(&feed, config)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Arxiv
    }
}

/// Parse an Arxiv Atom feed into snippets.
///
/// Extracted as a separate function for testability with fixture feeds.
pub(crate) fn parse_arxiv_feed(feed: &str, config: &SearchConfig) -> Result<Vec<Snippet>, SearchError> {
    let document = Html::parse_document(feed);

    let entry_sel = Selector::parse("entry")
        .map_err(|e| SearchError::Parse(format!("invalid entry selector: {e:?}")))?;
    let title_sel = Selector::parse("title")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let summary_sel = Selector::parse("summary")
        .map_err(|e| SearchError::Parse(format!("invalid summary selector: {e:?}")))?;
    let id_sel = Selector::parse("id")
        .map_err(|e| SearchError::Parse(format!("invalid id selector: {e:?}")))?;

    let mut snippets = Vec::new();

    for entry in document.select(&entry_sel) {
        let title = entry
            .select(&title_sel)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let url = entry
            .select(&id_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let summary = entry
            .select(&summary_sel)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        snippets.push(Snippet {
            title,
            url,
            text: truncate_chars(&summary, config.snippet_chars_max),
            source: SourceKind::Arxiv.name().to_string(),
        });

        if snippets.len() >= config.top_k_results {
            break;
        }
    }

    tracing::debug!(count = snippets.len(), "Arxiv entries parsed");
    Ok(snippets)
}

/// Collapse runs of whitespace (Atom feeds wrap text across indented lines).
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_ARXIV_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:attention</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <title>Attention Is All You Need</title>
    <summary>  The dominant sequence transduction models are based on complex
  recurrent or convolutional neural networks that include an encoder and a
  decoder.</summary>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2005.14165v4</id>
    <title>Language Models are Few-Shot Learners</title>
    <summary>Recent work has demonstrated substantial gains on many NLP tasks.</summary>
  </entry>
</feed>"#;

    fn config_with_k(k: usize) -> SearchConfig {
        SearchConfig {
            top_k_results: k,
            ..Default::default()
        }
    }

    #[test]
    fn parse_mock_feed_returns_entries() {
        let snippets = parse_arxiv_feed(MOCK_ARXIV_FEED, &config_with_k(10)).expect("parse");
        assert_eq!(snippets.len(), 2);

        assert_eq!(snippets[0].title, "Attention Is All You Need");
        assert_eq!(snippets[0].url, "http://arxiv.org/abs/1706.03762v7");
        assert!(snippets[0].text.starts_with("The dominant sequence"));
        assert_eq!(snippets[0].source, "Arxiv");
    }

    #[test]
    fn parse_collapses_summary_whitespace() {
        let snippets = parse_arxiv_feed(MOCK_ARXIV_FEED, &config_with_k(1)).expect("parse");
        assert!(!snippets[0].text.contains('\n'));
        assert!(!snippets[0].text.contains("  "));
    }

    #[test]
    fn parse_caps_at_top_k() {
        let snippets = parse_arxiv_feed(MOCK_ARXIV_FEED, &config_with_k(1)).expect("parse");
        assert_eq!(snippets.len(), 1);
    }

    #[test]
    fn parse_truncates_summary() {
        let config = SearchConfig {
            top_k_results: 10,
            snippet_chars_max: 20,
            ..Default::default()
        };
        let snippets = parse_arxiv_feed(MOCK_ARXIV_FEED, &config).expect("parse");
        for s in &snippets {
            assert!(s.text.chars().count() <= 20);
        }
    }

    #[test]
    fn parse_skips_feed_level_title() {
        // The feed-level <title> is not inside an <entry>, so it must not
        // produce a snippet of its own.
        let snippets = parse_arxiv_feed(MOCK_ARXIV_FEED, &config_with_k(10)).expect("parse");
        assert!(snippets.iter().all(|s| !s.title.contains("ArXiv Query")));
    }

    #[test]
    fn parse_empty_feed_returns_empty() {
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;
        let snippets = parse_arxiv_feed(feed, &config_with_k(10)).expect("parse");
        assert!(snippets.is_empty());
    }

    #[test]
    fn normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("a\n  b\t c"), "a b c");
        assert_eq!(normalize_whitespace("  leading and trailing  "), "leading and trailing");
    }

    #[test]
    fn kind_is_arxiv() {
        assert_eq!(ArxivEngine.kind(), SourceKind::Arxiv);
    }

    #[tokio::test]
    #[ignore] // Live test — run with `cargo test -- --ignored`
    async fn live_arxiv_search() {
        let engine = ArxivEngine;
        let results = engine.search("attention", &SearchConfig::default()).await;
        let results = results.expect("live search should work");
        assert!(!results.is_empty());
    }
}
