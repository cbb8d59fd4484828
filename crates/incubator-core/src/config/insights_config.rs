use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Insights cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// Max entries in the in-memory hot tier.
    pub hot_cache_size: u64,
    /// Max lifetime of a hot-tier entry in seconds.
    pub hot_cache_ttl_secs: u64,
    /// Optimistic append attempts before a version conflict is surfaced.
    pub max_append_attempts: u32,
}

impl InsightsConfig {
    pub fn hot_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.hot_cache_ttl_secs)
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            hot_cache_size: defaults::DEFAULT_HOT_CACHE_SIZE,
            hot_cache_ttl_secs: defaults::DEFAULT_HOT_CACHE_TTL_SECS,
            max_append_attempts: defaults::DEFAULT_MAX_APPEND_ATTEMPTS,
        }
    }
}
