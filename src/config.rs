//! Configuration for the chat system.
//!
//! All settings are optional in the TOML file; missing fields fall back to
//! defaults that match the original chatbot's fixed choices (Groq
//! `llama3-8b-8192`, streaming on, one search result capped at 200
//! characters).

use crate::credentials::CredentialRef;
use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// LLM provider settings.
    pub llm: LlmConfig,
    /// Voice capture and transcription settings.
    pub voice: VoiceConfig,
    /// Retrieval tool settings.
    pub search: SearchSettings,
}

/// LLM provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider base URL. Tests point this at a local mock server.
    pub api_url: String,
    /// The fixed model identifier used for every invocation.
    pub api_model: String,
    /// API key reference. Interactive input takes precedence over the file.
    pub api_key: CredentialRef,
    /// Maximum tokens per response.
    pub max_tokens: usize,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai".to_owned(),
            api_model: "llama3-8b-8192".to_owned(),
            api_key: CredentialRef::None,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// Voice capture and transcription settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Sample rate delivered to the transcriber (input is downsampled to this).
    pub input_sample_rate: u32,
    /// Hard cap on a single listening window, in seconds.
    pub listen_max_secs: u64,
    /// RMS level below which a frame counts as silence.
    pub silence_threshold: f32,
    /// Trailing silence that ends a capture once speech has been heard, in ms.
    pub silence_hold_ms: u64,
    /// Transcription endpoint URL. Tests point this at a local mock server.
    pub stt_url: String,
    /// Transcription model identifier.
    pub stt_model: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            input_sample_rate: 16_000,
            listen_max_secs: 8,
            silence_threshold: 0.01,
            silence_hold_ms: 800,
            stt_url: "https://api.groq.com/openai/v1/audio/transcriptions".to_owned(),
            stt_model: "whisper-large-v3".to_owned(),
        }
    }
}

/// Retrieval tool settings, mirrored into [`sibyl_search::SearchConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results per query.
    pub top_k_results: usize,
    /// Per-snippet character cap.
    pub snippet_chars_max: usize,
    /// HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Safe-search flag for engines that support it.
    pub safe_search: bool,
    /// Override the engine endpoint URL. Tests point this at a local mock
    /// server; `None` targets the real backends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            top_k_results: 1,
            snippet_chars_max: 200,
            timeout_seconds: 8,
            safe_search: true,
            base_url: None,
        }
    }
}

impl SearchSettings {
    /// Convert into the member crate's config type.
    #[must_use]
    pub fn to_search_config(&self) -> sibyl_search::SearchConfig {
        sibyl_search::SearchConfig {
            top_k_results: self.top_k_results,
            snippet_chars_max: self.snippet_chars_max,
            timeout_seconds: self.timeout_seconds,
            safe_search: self.safe_search,
            base_url: self.base_url.clone(),
            ..Default::default()
        }
    }
}

impl ChatConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            ChatError::Config(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// Save configuration to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns a config error if serialization or writing fails.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| ChatError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Returns the platform-appropriate default config path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sibyl")
            .join("config.toml")
    }
}
