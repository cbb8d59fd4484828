//! Stable error codes for the API boundary.

/// Every error enum provides a structured code string so API handlers can
/// map failures without matching on messages.
pub trait IncubatorErrorCode {
    fn error_code(&self) -> &'static str;

    /// `[ERROR_CODE] message`.
    fn coded_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const ENHANCEMENT_IN_PROGRESS: &str = "ENHANCEMENT_IN_PROGRESS";
pub const PROVIDER_TIMEOUT: &str = "PROVIDER_TIMEOUT";
pub const PROVIDER_TRANSIENT: &str = "PROVIDER_TRANSIENT";
pub const PROVIDER_MALFORMED: &str = "PROVIDER_MALFORMED";
pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const VERSION_CONFLICT: &str = "VERSION_CONFLICT";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const TASK_ABORTED: &str = "TASK_ABORTED";
