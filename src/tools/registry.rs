//! Tool selection and the single-tool registry.
//!
//! The user picks one retrieval source; the registry maps that closed
//! choice to exactly one [`Tool`]. Selecting a source replaces, never
//! augments, the tool available to the agent. Adding a source means one
//! enum variant and one dispatch arm.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sibyl_search::{SearchConfig, SourceKind};

use super::retrieval::RetrievalTool;
use super::Tool;

/// The user-selectable retrieval sources. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolSelection {
    /// DuckDuckGo web search. The UI's initial value.
    #[default]
    Search,
    /// Arxiv paper lookup.
    Arxiv,
    /// Wikipedia article lookup.
    Wikipedia,
}

impl ToolSelection {
    /// The retrieval source this selection maps to.
    #[must_use]
    pub fn source(&self) -> SourceKind {
        match self {
            Self::Search => SourceKind::DuckDuckGo,
            Self::Arxiv => SourceKind::Arxiv,
            Self::Wikipedia => SourceKind::Wikipedia,
        }
    }

    /// All selectable values, in display order.
    pub fn all() -> &'static [ToolSelection] {
        &[Self::Search, Self::Arxiv, Self::Wikipedia]
    }
}

impl std::fmt::Display for ToolSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search => write!(f, "DuckDuckGo"),
            Self::Arxiv => write!(f, "Arxiv"),
            Self::Wikipedia => write!(f, "Wikipedia"),
        }
    }
}

impl FromStr for ToolSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" | "duckduckgo" | "web" => Ok(Self::Search),
            "arxiv" => Ok(Self::Arxiv),
            "wikipedia" | "wiki" => Ok(Self::Wikipedia),
            other => Err(format!("unknown tool selection: {other}")),
        }
    }
}

/// Registry of the tools available to one agent invocation.
///
/// Built per request from the session's [`ToolSelection`]; always holds
/// exactly one tool.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Build a registry holding exactly the tool for `selection`.
    #[must_use]
    pub fn for_selection(selection: ToolSelection, config: SearchConfig) -> Self {
        let tool: Arc<dyn Tool> = Arc::new(RetrievalTool::new(selection.source(), config));
        let mut tools = HashMap::new();
        tools.insert(tool.name().to_string(), tool);
        Self { tools }
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Number of registered tools. Always 1 after `for_selection`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty. Never true after `for_selection`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Names of all registered tools, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.values().map(|t| t.name()).collect();
        names.sort_unstable();
        names
    }

    /// Export JSON schemas for all registered tools (for the provider request).
    ///
    /// Each entry contains `name`, `description`, and `parameters`.
    #[must_use]
    pub fn schemas_for_api(&self) -> Vec<serde_json::Value> {
        let mut schemas: Vec<(String, serde_json::Value)> = self
            .tools
            .values()
            .map(|t| {
                let entry = serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.schema(),
                });
                (t.name().to_string(), entry)
            })
            .collect();
        schemas.sort_by(|a, b| a.0.cmp(&b.0));
        schemas.into_iter().map(|(_, v)| v).collect()
    }
}
