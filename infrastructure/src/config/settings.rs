//! Typed settings with built-in defaults.

use serde::{Deserialize, Serialize};

/// Default Gemini model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Default base URL of the Gemini REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Model identifier sent to the backend.
    pub model: String,

    /// Backend credential. Empty means not configured.
    pub api_key: String,

    /// Base URL of the generation API (overridable for testing).
    pub api_base_url: String,

    /// Origins the transport layer may accept. `*` means any.
    pub allowed_origins: Vec<String>,

    /// Per-call timeout for generation requests, in seconds.
    pub request_timeout_secs: u64,

    /// Conversation turns retained by the reducer.
    pub history_max_turns: usize,

    /// Maximum critique rounds per deep review.
    pub iteration_cap: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 60,
            history_max_turns: 48,
            iteration_cap: 3,
        }
    }
}

impl Settings {
    pub fn is_api_key_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Validate the settings, returning a list of issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.model.trim().is_empty() {
            issues.push("model must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            issues.push("request_timeout_secs must be >= 1".to_string());
        }
        if self.history_max_turns == 0 {
            issues.push("history_max_turns must be >= 1".to_string());
        }
        if self.iteration_cap == 0 {
            issues.push("iteration_cap must be >= 1".to_string());
        }
        issues
    }
}

/// Parse an `ALLOWED_ORIGINS` style value: comma-separated list, with
/// empty or `*` meaning any origin.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return vec!["*".to_string()];
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
