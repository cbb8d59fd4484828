//! Generation backends.

pub mod http_backend;
pub mod offline;

use tracing::warn;

use incubator_core::config::ProviderConfig;
use incubator_core::errors::ProviderError;
use incubator_core::models::GenerationRequest;
use incubator_core::traits::IGenerationBackend;

pub use http_backend::HttpBackend;
pub use offline::OfflineBackend;

/// The backend selected by configuration.
pub enum ConfiguredBackend {
    Http(HttpBackend),
    Offline(OfflineBackend),
}

impl IGenerationBackend for ConfiguredBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        match self {
            Self::Http(backend) => backend.generate(request).await,
            Self::Offline(backend) => backend.generate(request).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Http(backend) => backend.name(),
            Self::Offline(backend) => backend.name(),
        }
    }
}

/// Build the configured backend. A missing API key selects the offline
/// backend so the pipeline degrades to fallback content instead of failing.
pub fn create_backend(config: &ProviderConfig) -> Result<ConfiguredBackend, ProviderError> {
    if config.backend == "offline" {
        return Ok(ConfiguredBackend::Offline(OfflineBackend::new()));
    }
    match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(ConfiguredBackend::Http(HttpBackend::new(config, key)?)),
        _ => {
            warn!("no provider API key configured, serving fallback content only");
            Ok(ConfiguredBackend::Offline(OfflineBackend::new()))
        }
    }
}
