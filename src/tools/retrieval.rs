//! Retrieval tool wrapping the sibyl-search engines.
//!
//! One [`RetrievalTool`] instance is scoped to a single [`SourceKind`];
//! the registry decides which. Bridges the async search API behind the
//! synchronous [`Tool`] interface with `Handle::current().block_on()`
//! (the agent loop runs tools on a blocking thread).

use crate::error::ChatError;
use sibyl_search::{SearchConfig, SourceKind};

use super::{Tool, ToolResult};

/// A retrieval capability scoped to one source.
pub struct RetrievalTool {
    kind: SourceKind,
    config: SearchConfig,
}

impl RetrievalTool {
    /// Create a tool querying `kind` with the given search config.
    pub fn new(kind: SourceKind, config: SearchConfig) -> Self {
        Self { kind, config }
    }

    /// The source this tool queries.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        self.kind
    }
}

impl Tool for RetrievalTool {
    fn name(&self) -> &str {
        match self.kind {
            SourceKind::DuckDuckGo => "search",
            SourceKind::Arxiv => "arxiv",
            SourceKind::Wikipedia => "wikipedia",
        }
    }

    fn description(&self) -> &str {
        match self.kind {
            SourceKind::DuckDuckGo => {
                "Search the web with DuckDuckGo. Returns titles, URLs, and snippets."
            }
            SourceKind::Arxiv => {
                "Look up scientific papers on Arxiv. Returns titles, links, and abstracts."
            }
            SourceKind::Wikipedia => {
                "Look up encyclopedia articles on Wikipedia. Returns titles, links, and excerpts."
            }
        }
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ChatError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ChatError::Tool("missing required argument: query".into()))?;

        if query.trim().is_empty() {
            return Err(ChatError::Tool("query must not be empty".into()));
        }

        // Bridge sync Tool::execute to the async search API.
        let handle = tokio::runtime::Handle::current();
        let snippets = handle
            .block_on(sibyl_search::search(self.kind, query, &self.config))
            .map_err(|e| ChatError::Tool(format!("{} lookup failed: {e}", self.kind)))?;

        if snippets.is_empty() {
            return Ok(ToolResult::success(format!(
                "No results found for \"{query}\"."
            )));
        }

        let mut output = format!("## {} results for \"{query}\"\n\n", self.kind);
        for (i, snippet) in snippets.iter().enumerate() {
            output.push_str(&format!(
                "{}. **{}**\n   URL: {}\n   {}\n\n",
                i + 1,
                snippet.title,
                snippet.url,
                snippet.text,
            ));
        }

        Ok(ToolResult::success(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_per_source() {
        let config = SearchConfig::default();
        assert_eq!(RetrievalTool::new(SourceKind::DuckDuckGo, config.clone()).name(), "search");
        assert_eq!(RetrievalTool::new(SourceKind::Arxiv, config.clone()).name(), "arxiv");
        assert_eq!(RetrievalTool::new(SourceKind::Wikipedia, config).name(), "wikipedia");
    }

    #[test]
    fn schema_requires_query() {
        let tool = RetrievalTool::new(SourceKind::Wikipedia, SearchConfig::default());
        let schema = tool.schema();
        let required = schema
            .get("required")
            .and_then(|v| v.as_array())
            .expect("schema should have required");
        assert!(required.iter().any(|v| v.as_str() == Some("query")));
        assert!(schema["properties"].get("query").is_some());
    }

    #[test]
    fn missing_query_is_a_validation_error() {
        let tool = RetrievalTool::new(SourceKind::Arxiv, SearchConfig::default());
        let err = tool.execute(serde_json::json!({})).unwrap_err();
        assert!(err.to_string().contains("query"));
    }

    #[test]
    fn empty_query_is_a_validation_error() {
        let tool = RetrievalTool::new(SourceKind::Arxiv, SearchConfig::default());
        let err = tool.execute(serde_json::json!({"query": "   "})).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn descriptions_are_non_empty() {
        for kind in SourceKind::all() {
            let tool = RetrievalTool::new(*kind, SearchConfig::default());
            assert!(!tool.description().is_empty());
        }
    }

    // execute() with a real query needs a tokio runtime and network; the
    // validation paths above return before the block_on bridge.
}
