use std::future::Future;

use crate::errors::ProviderError;
use crate::models::GenerationRequest;

/// A content-generation service. Returns raw text; normalization happens in
/// the provider client.
pub trait IGenerationBackend: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
