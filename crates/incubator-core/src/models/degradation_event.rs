use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded whenever a generation request is answered with templated
/// fallback content instead of provider output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}
