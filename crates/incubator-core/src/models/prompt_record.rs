use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::generation::RequestKind;

/// Audit trail entry for a prompt sent to the generation backend.
/// Only the blake3 hash of the prompt is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub kind: RequestKind,
    pub concept_id: String,
    pub prompt_hash: String,
    pub sent_at: DateTime<Utc>,
}
