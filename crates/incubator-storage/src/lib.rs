//! # incubator-storage
//!
//! Concept and insight persistence.
//!
//! - [`SqliteStore`]: single writer connection plus a read pool, WAL mode,
//!   idempotent migrations, cascading deletes via foreign keys.
//! - [`MemoryStore`]: dashmap-backed store with the same semantics, for
//!   tests and ephemeral runs.

pub mod engine;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod queries;

use std::path::Path;
use std::sync::Arc;

use incubator_core::config::StorageConfig;
use incubator_core::errors::{IncubatorError, IncubatorResult, StorageError};
use incubator_core::traits::{IConceptStore, IInsightStore};

pub use engine::SqliteStore;
pub use memory::MemoryStore;

/// Convert an error message into a storage error.
pub fn to_storage_err(message: String) -> IncubatorError {
    IncubatorError::Storage(StorageError::SqliteError { message })
}

/// The two store handles the pipeline needs, backed by one store instance.
#[derive(Clone)]
pub struct StoreHandles {
    pub concepts: Arc<dyn IConceptStore>,
    pub insights: Arc<dyn IInsightStore>,
}

impl StoreHandles {
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: IConceptStore + IInsightStore + 'static,
    {
        Self {
            concepts: store.clone(),
            insights: store,
        }
    }
}

/// Open the store selected by `config.backend`.
pub fn open_stores(config: &StorageConfig) -> IncubatorResult<StoreHandles> {
    match config.backend.as_str() {
        "memory" => Ok(StoreHandles::from_store(Arc::new(MemoryStore::new()))),
        _ => {
            let store = SqliteStore::open_with_config(Path::new(&config.db_path), config)?;
            Ok(StoreHandles::from_store(Arc::new(store)))
        }
    }
}
