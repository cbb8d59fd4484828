use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Lifecycle notifications for a long-running enhancement or insights
/// generation, delivered over an optional channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// This caller started a new attempt.
    Started { concept_id: String },
    /// This caller joined an attempt that was already running.
    Attached { concept_id: String },
    /// Waiting on the generation provider.
    Generating { concept_id: String },
    /// Writing the result to the store.
    Persisting { concept_id: String },
    Completed {
        concept_id: String,
        is_ai_generated: bool,
    },
    Failed { concept_id: String, code: String },
}

impl ProgressEvent {
    pub fn concept_id(&self) -> &str {
        match self {
            Self::Started { concept_id }
            | Self::Attached { concept_id }
            | Self::Generating { concept_id }
            | Self::Persisting { concept_id }
            | Self::Completed { concept_id, .. }
            | Self::Failed { concept_id, .. } => concept_id,
        }
    }

    /// Whether no further events follow this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

/// Where progress events go. A closed or absent receiver is not an error:
/// progress is best-effort and never affects the operation itself.
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressSink {
    pub fn none() -> Self {
        Self { tx: None }
    }

    pub fn channel(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
