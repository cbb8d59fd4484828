use serde::{Deserialize, Serialize};

/// What a second enhancement request does while one is already running for
/// the same concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrentPolicy {
    /// Wait for the running attempt and share its result.
    #[default]
    Attach,
    /// Fail immediately with `ConcurrentEnhancementInProgress`.
    Reject,
}

/// Enhancement orchestrator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    pub concurrent_policy: ConcurrentPolicy,
}
