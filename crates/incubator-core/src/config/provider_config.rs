use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Generation provider configuration: endpoint, timeout, and retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Backend: "gemini" (HTTP) or "offline" (fallback content only).
    pub backend: String,
    /// API key. Without one the HTTP backend is replaced by the offline one.
    pub api_key: Option<String>,
    /// Model identifier sent to the service.
    pub model: String,
    /// Base URL of the generation service.
    pub base_url: String,
    /// Bounded wait per provider call.
    pub timeout_secs: u64,
    /// Additional attempts after the first one for transient failures.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff_ms: u64,
    /// Growth factor between consecutive retry delays.
    pub backoff_multiplier: f64,
    /// Upper bound on a single retry delay.
    pub max_backoff_ms: u64,
    /// Insight sections shorter than this are treated as malformed.
    pub min_insight_chars: usize,
    /// Prompt records kept in memory; the oldest are dropped beyond this.
    pub prompt_log_capacity: usize,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: defaults::DEFAULT_PROVIDER_BACKEND.to_string(),
            api_key: None,
            model: defaults::DEFAULT_PROVIDER_MODEL.to_string(),
            base_url: defaults::DEFAULT_PROVIDER_BASE_URL.to_string(),
            timeout_secs: defaults::DEFAULT_PROVIDER_TIMEOUT_SECS,
            max_retries: defaults::DEFAULT_PROVIDER_MAX_RETRIES,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            backoff_multiplier: defaults::DEFAULT_BACKOFF_MULTIPLIER,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
            min_insight_chars: defaults::DEFAULT_MIN_INSIGHT_CHARS,
            prompt_log_capacity: defaults::DEFAULT_PROMPT_LOG_CAPACITY,
        }
    }
}
