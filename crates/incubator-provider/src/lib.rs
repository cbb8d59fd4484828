//! # incubator-provider
//!
//! Everything between the pipeline and the external content-generation
//! service.
//!
//! ```text
//! ProviderClient
//!  ├── prompts      per-request prompt text
//!  ├── retry        timeout + exponential backoff for transient failures
//!  ├── normalize    free text → ContentBlock, JSON scores
//!  ├── fallback     deterministic templated content
//!  └── backends     HttpBackend (reqwest) | OfflineBackend
//! ```
//!
//! Provider failures never escape the client: after retries are exhausted
//! the caller receives fallback content marked `is_ai_generated = false` and
//! a degradation event is recorded.

pub mod backends;
pub mod client;
pub mod fallback;
pub mod normalize;
pub mod prompts;
pub mod retry;

pub use backends::{create_backend, ConfiguredBackend, HttpBackend, OfflineBackend};
pub use client::ProviderClient;
pub use retry::RetryPolicy;
