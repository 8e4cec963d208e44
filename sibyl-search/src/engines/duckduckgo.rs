//! DuckDuckGo web search — the chatbot's general "Search" source.
//!
//! Uses the HTML-only version at `https://html.duckduckgo.com/html/`
//! which requires no JavaScript and tolerates automated requests.

use crate::config::SearchConfig;
use crate::engine::Engine;
use crate::error::SearchError;
use crate::http;
use crate::types::{truncate_chars, Snippet, SourceKind};
use scraper::{Html, Selector};
use url::Url;

const DUCKDUCKGO_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo HTML search scraper.
pub struct DuckDuckGoEngine;

impl DuckDuckGoEngine {
    /// Extract the target URL from DuckDuckGo's redirect wrapper.
    ///
    /// DDG wraps result links like
    /// `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`;
    /// the `uddg` query parameter holds the percent-encoded target.
    fn unwrap_redirect(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }
}

impl Engine for DuckDuckGoEngine {
    async fn search(&self, query: &str, config: &SearchConfig) -> Result<Vec<Snippet>, SearchError> {
        tracing::trace!(query, "DuckDuckGo search");

        let client = http::build_client(config)?;

        let mut params = vec![("q", query)];
        if config.safe_search {
            params.push(("kp", "1"));
        }

        let endpoint = config.base_url.as_deref().unwrap_or(DUCKDUCKGO_ENDPOINT);
        let response = client
            .post(endpoint)
            .form(&params)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("DuckDuckGo HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_duckduckgo_html(&html, config)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::DuckDuckGo
    }
}

/// Parse DuckDuckGo HTML into snippets.
///
/// Extracted as a separate function for testability with mock HTML.
pub(crate) fn parse_duckduckgo_html(
    html: &str,
    config: &SearchConfig,
) -> Result<Vec<Snippet>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut snippets = Vec::new();

    for element in document.select(&result_sel) {
        let title_el = match element.select(&title_sel).next() {
            Some(el) => el,
            None => continue,
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let href = match title_el.value().attr("href") {
            Some(h) => h,
            None => continue,
        };

        let url = match DuckDuckGoEngine::unwrap_redirect(href) {
            Some(u) => u,
            None => continue,
        };

        let text = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        snippets.push(Snippet {
            title,
            url,
            text: truncate_chars(&text, config.snippet_chars_max),
            source: SourceKind::DuckDuckGo.name().to_string(),
        });

        if snippets.len() >= config.top_k_results {
            break;
        }
    }

    tracing::debug!(count = snippets.len(), "DuckDuckGo results parsed");
    Ok(snippets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_DDG_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc123">
        Rust Programming Language
    </a>
    <div class="result__snippet">
        A language empowering everyone to build reliable and efficient software.
    </div>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://doc.rust-lang.org/book/">
        The Rust Programming Language Book
    </a>
    <div class="result__snippet">
        An introductory book about Rust.
    </div>
</div>
</body>
</html>"#;

    fn config_with_k(k: usize) -> SearchConfig {
        SearchConfig {
            top_k_results: k,
            ..Default::default()
        }
    }

    #[test]
    fn unwrap_redirect_from_ddg_wrapper() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc";
        let result = DuckDuckGoEngine::unwrap_redirect(href);
        assert_eq!(result, Some("https://example.com/page".to_string()));
    }

    #[test]
    fn unwrap_redirect_direct_link_passes_through() {
        let href = "https://example.com/direct";
        let result = DuckDuckGoEngine::unwrap_redirect(href);
        assert_eq!(result, Some("https://example.com/direct".to_string()));
    }

    #[test]
    fn unwrap_redirect_invalid_url() {
        assert!(DuckDuckGoEngine::unwrap_redirect("not-a-url").is_none());
    }

    #[test]
    fn parse_mock_html_returns_snippets() {
        let snippets = parse_duckduckgo_html(MOCK_DDG_HTML, &config_with_k(10)).expect("parse");
        assert_eq!(snippets.len(), 2);

        assert_eq!(snippets[0].title, "Rust Programming Language");
        assert_eq!(snippets[0].url, "https://www.rust-lang.org/");
        assert!(snippets[0].text.contains("reliable and efficient"));
        assert_eq!(snippets[0].source, "DuckDuckGo");
    }

    #[test]
    fn parse_caps_at_top_k() {
        let snippets = parse_duckduckgo_html(MOCK_DDG_HTML, &config_with_k(1)).expect("parse");
        assert_eq!(snippets.len(), 1);
    }

    #[test]
    fn parse_truncates_snippet_text() {
        let config = SearchConfig {
            top_k_results: 10,
            snippet_chars_max: 10,
            ..Default::default()
        };
        let snippets = parse_duckduckgo_html(MOCK_DDG_HTML, &config).expect("parse");
        for s in &snippets {
            assert!(s.text.chars().count() <= 10);
        }
    }

    #[test]
    fn parse_empty_html_returns_empty() {
        let snippets =
            parse_duckduckgo_html("<html><body></body></html>", &config_with_k(10)).expect("parse");
        assert!(snippets.is_empty());
    }

    #[test]
    fn kind_is_duckduckgo() {
        assert_eq!(DuckDuckGoEngine.kind(), SourceKind::DuckDuckGo);
    }

    #[tokio::test]
    #[ignore] // Live test — run with `cargo test -- --ignored`
    async fn live_duckduckgo_search() {
        let engine = DuckDuckGoEngine;
        let results = engine
            .search("rust programming", &SearchConfig::default())
            .await;
        let results = results.expect("live search should work");
        assert!(!results.is_empty());
    }
}
