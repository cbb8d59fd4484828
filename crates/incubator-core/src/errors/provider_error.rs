//! Generation provider errors.

use super::error_code::{self, IncubatorErrorCode};

/// Failures talking to the external content-generation service.
///
/// These are resolved inside the provider client by retry and fallback and
/// only reach callers through diagnostics (degradation events, logs).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("provider call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("provider transient failure: {reason}")]
    Transient { reason: String },

    #[error("provider rate limited: {reason}")]
    RateLimited { reason: String },

    #[error("provider response could not be normalized: {reason}")]
    MalformedResponse { reason: String },

    #[error("provider rejected request: {reason}")]
    InvalidRequest { reason: String },

    #[error("provider unavailable: {provider}")]
    Unavailable { provider: String },
}

impl ProviderError {
    /// Transient failures are retried with backoff; everything else goes
    /// straight to fallback.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Transient { .. }
                | Self::RateLimited { .. }
                | Self::MalformedResponse { .. }
        )
    }
}

impl IncubatorErrorCode for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => error_code::PROVIDER_TIMEOUT,
            Self::Transient { .. } | Self::RateLimited { .. } => error_code::PROVIDER_TRANSIENT,
            Self::MalformedResponse { .. } => error_code::PROVIDER_MALFORMED,
            Self::InvalidRequest { .. } | Self::Unavailable { .. } => error_code::PROVIDER_ERROR,
        }
    }
}
