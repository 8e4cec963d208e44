//! API credential references.
//!
//! The chatbot's credential is supplied interactively by the presentation
//! layer (the original takes it from a settings field). A reference can
//! also point at an environment variable as a convenience for scripted
//! runs; resolution happens at request-build time.

use serde::{Deserialize, Serialize};

/// Reference to the provider API key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    /// No credential configured.
    #[default]
    None,
    /// Inline key, as typed into the settings field.
    Plaintext {
        /// The key value.
        value: String,
    },
    /// Resolve the key from an environment variable.
    Env {
        /// The environment variable name.
        var: String,
    },
}

impl CredentialRef {
    /// Create a plaintext reference from an interactively supplied key.
    pub fn plaintext(value: impl Into<String>) -> Self {
        Self::Plaintext {
            value: value.into(),
        }
    }

    /// Whether a credential is configured at all.
    ///
    /// The orchestrator's caller uses this to enforce the key-present
    /// precondition before invoking the agent.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::None => false,
            Self::Plaintext { value } => !value.trim().is_empty(),
            Self::Env { var } => std::env::var(var)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false),
        }
    }

    /// Resolve the credential to its plaintext value.
    ///
    /// Returns an empty string when nothing is configured; the provider's
    /// own auth failure is the error path for a missing key.
    #[must_use]
    pub fn resolve_plaintext(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Plaintext { value } => value.clone(),
            Self::Env { var } => std::env::var(var).unwrap_or_default(),
        }
    }
}
