//! Configuration with layered resolution.

pub mod defaults;
pub mod enhancement_config;
pub mod insights_config;
pub mod observability_config;
pub mod provider_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use enhancement_config::{ConcurrentPolicy, EnhancementConfig};
pub use insights_config::InsightsConfig;
pub use observability_config::ObservabilityConfig;
pub use provider_config::ProviderConfig;
pub use storage_config::StorageConfig;

use crate::errors::ConfigError;

/// Project config file name looked up in the root passed to [`IncubatorConfig::load`].
pub const CONFIG_FILENAME: &str = "incubator.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`INCUBATOR_*`, plus `GEMINI_API_KEY`)
/// 2. Project config (`incubator.toml` in the root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IncubatorConfig {
    pub storage: StorageConfig,
    pub provider: ProviderConfig,
    pub enhancement: EnhancementConfig,
    pub insights: InsightsConfig,
    pub observability: ObservabilityConfig,
}

impl IncubatorConfig {
    /// Load configuration from `root/incubator.toml` and the process environment.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(root, |key| std::env::var(key).ok())
    }

    /// Load configuration with an explicit environment lookup.
    pub fn load_with_env<F>(root: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = root.join(CONFIG_FILENAME);
        let mut config = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides(env);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides.
    /// Pattern: `INCUBATOR_<SECTION>_<FIELD>`. Unparseable values are ignored.
    pub fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env("INCUBATOR_STORAGE_BACKEND") {
            self.storage.backend = v;
        }
        if let Some(v) = env("INCUBATOR_STORAGE_DB_PATH") {
            self.storage.db_path = v;
        }
        if let Some(v) = env("INCUBATOR_PROVIDER_BACKEND") {
            self.provider.backend = v;
        }
        // The dedicated variable wins over the vendor one.
        if let Some(v) = env("INCUBATOR_PROVIDER_API_KEY").or_else(|| env("GEMINI_API_KEY")) {
            self.provider.api_key = Some(v);
        }
        if let Some(v) = env("INCUBATOR_PROVIDER_MODEL") {
            self.provider.model = v;
        }
        if let Some(v) = env("INCUBATOR_PROVIDER_BASE_URL") {
            self.provider.base_url = v;
        }
        if let Some(v) = env("INCUBATOR_PROVIDER_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.provider.timeout_secs = v;
        }
        if let Some(v) = env("INCUBATOR_PROVIDER_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            self.provider.max_retries = v;
        }
        if let Some(v) = env("INCUBATOR_ENHANCEMENT_CONCURRENT_POLICY") {
            match v.to_ascii_lowercase().as_str() {
                "attach" => self.enhancement.concurrent_policy = ConcurrentPolicy::Attach,
                "reject" => self.enhancement.concurrent_policy = ConcurrentPolicy::Reject,
                _ => {}
            }
        }
        if let Some(v) = env("INCUBATOR_LOG_LEVEL") {
            self.observability.log_level = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.storage.backend.as_str(), "sqlite" | "memory") {
            return Err(invalid("storage.backend", "must be \"sqlite\" or \"memory\""));
        }
        if !(1..=8).contains(&self.storage.read_pool_size) {
            return Err(invalid("storage.read_pool_size", "must be between 1 and 8"));
        }
        if !matches!(self.provider.backend.as_str(), "gemini" | "offline") {
            return Err(invalid("provider.backend", "must be \"gemini\" or \"offline\""));
        }
        if self.provider.timeout_secs == 0 {
            return Err(invalid("provider.timeout_secs", "must be greater than 0"));
        }
        if !(self.provider.backoff_multiplier >= 1.0) {
            return Err(invalid("provider.backoff_multiplier", "must be at least 1.0"));
        }
        if self.provider.max_backoff_ms < self.provider.initial_backoff_ms {
            return Err(invalid(
                "provider.max_backoff_ms",
                "must not be smaller than provider.initial_backoff_ms",
            ));
        }
        if self.provider.prompt_log_capacity == 0 {
            return Err(invalid("provider.prompt_log_capacity", "must be greater than 0"));
        }
        if self.insights.hot_cache_size == 0 {
            return Err(invalid("insights.hot_cache_size", "must be greater than 0"));
        }
        if self.insights.max_append_attempts == 0 {
            return Err(invalid("insights.max_append_attempts", "must be at least 1"));
        }
        if !LOG_LEVELS.contains(&self.observability.log_level.to_ascii_lowercase().as_str()) {
            return Err(invalid(
                "observability.log_level",
                "must be one of trace, debug, info, warn, error",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
