//! Error handling for the Incubator pipeline.
//! One error enum per subsystem, `thiserror` only. Every enum is `Clone` so a
//! single-flight result can be handed to every waiter.

pub mod config_error;
pub mod error_code;
pub mod provider_error;
pub mod storage_error;
pub mod validation_error;

pub use config_error::ConfigError;
pub use error_code::IncubatorErrorCode;
pub use provider_error::ProviderError;
pub use storage_error::StorageError;
pub use validation_error::ValidationError;

/// Aggregate error for every fallible operation in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncubatorError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("concept not found: {id}")]
    ConceptNotFound { id: String },

    #[error("enhancement already in progress for concept {id}")]
    ConcurrentEnhancementInProgress { id: String },

    #[error("background task aborted: {reason}")]
    TaskAborted { reason: String },
}

impl IncubatorError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::ConceptNotFound { id: id.into() }
    }
}

impl IncubatorErrorCode for IncubatorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Provider(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::ConceptNotFound { .. } => error_code::NOT_FOUND,
            Self::ConcurrentEnhancementInProgress { .. } => error_code::ENHANCEMENT_IN_PROGRESS,
            Self::TaskAborted { .. } => error_code::TASK_ABORTED,
        }
    }
}

pub type IncubatorResult<T> = Result<T, IncubatorError>;
