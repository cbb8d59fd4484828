//! A backend that never reaches a provider.

use incubator_core::errors::ProviderError;
use incubator_core::models::GenerationRequest;
use incubator_core::traits::IGenerationBackend;

/// Every call fails with `Unavailable`, which the client answers with
/// fallback content without retrying.
#[derive(Debug, Clone, Default)]
pub struct OfflineBackend;

impl OfflineBackend {
    pub fn new() -> Self {
        Self
    }
}

impl IGenerationBackend for OfflineBackend {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable {
            provider: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "offline"
    }
}
