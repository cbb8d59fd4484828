pub mod generation;
pub mod storage;

pub use generation::IGenerationBackend;
pub use storage::{IConceptStore, IInsightStore};
