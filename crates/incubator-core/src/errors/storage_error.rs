//! Storage-layer errors.

use super::error_code::{self, IncubatorErrorCode};

/// Persistence failures. Always surfaced, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("version conflict for {idea_id}: expected current version {expected}, found {actual}")]
    VersionConflict {
        idea_id: String,
        expected: u32,
        actual: u32,
    },

    #[error("lock poisoned: {reason}")]
    LockPoisoned { reason: String },
}

impl IncubatorErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::VersionConflict { .. } => error_code::VERSION_CONFLICT,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
