//! SqliteStore: owns the connection pool, runs migrations on open, and
//! implements both store traits.

use std::path::Path;

use tracing::debug;

use incubator_core::config::StorageConfig;
use incubator_core::errors::IncubatorResult;
use incubator_core::models::{Concept, ConceptUpdate, InsightRecord, NewInsightRecord};
use incubator_core::traits::{IConceptStore, IInsightStore};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{concept_crud, insight_ops};

pub struct SqliteStore {
    pool: ConnectionPool,
    /// File-backed stores read through the pool. In-memory read connections
    /// are isolated databases, so in that mode reads go through the writer.
    use_read_pool: bool,
}

impl SqliteStore {
    /// Open a store backed by a file on disk with default pool settings.
    pub fn open(path: &Path) -> IncubatorResult<Self> {
        Self::open_with_config(path, &StorageConfig::default())
    }

    pub fn open_with_config(path: &Path, config: &StorageConfig) -> IncubatorResult<Self> {
        let pool = ConnectionPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        let store = Self {
            pool,
            use_read_pool: true,
        };
        store.initialize()?;
        debug!(path = %path.display(), readers = store.pool.readers.size(), "opened sqlite store");
        Ok(store)
    }

    /// Open an in-memory store.
    pub fn open_in_memory() -> IncubatorResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let store = Self {
            pool,
            use_read_pool: false,
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> IncubatorResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn).map(|_| ()))
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn schema_version(&self) -> IncubatorResult<u32> {
        self.pool.writer.with_conn_sync(migrations::current_version)
    }

    fn with_reader<F, T>(&self, f: F) -> IncubatorResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> IncubatorResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl IConceptStore for SqliteStore {
    fn create(&self, concept: &Concept) -> IncubatorResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| concept_crud::insert_concept(conn, concept))
    }

    fn get(&self, id: &str) -> IncubatorResult<Option<Concept>> {
        self.with_reader(|conn| concept_crud::get_concept(conn, id))
    }

    fn update(&self, id: &str, update: &ConceptUpdate) -> IncubatorResult<Concept> {
        self.pool
            .writer
            .with_conn_sync(|conn| concept_crud::update_concept(conn, id, update))
    }

    fn delete(&self, id: &str) -> IncubatorResult<bool> {
        self.pool
            .writer
            .with_conn_sync(|conn| concept_crud::delete_concept(conn, id))
    }
}

impl IInsightStore for SqliteStore {
    fn append(&self, record: &NewInsightRecord) -> IncubatorResult<InsightRecord> {
        self.pool
            .writer
            .with_conn_sync(|conn| insight_ops::append_insight(conn, record))
    }

    fn get_current(&self, idea_id: &str) -> IncubatorResult<Option<InsightRecord>> {
        self.with_reader(|conn| insight_ops::get_current(conn, idea_id))
    }

    fn get_history(&self, idea_id: &str) -> IncubatorResult<Vec<InsightRecord>> {
        self.with_reader(|conn| insight_ops::get_history(conn, idea_id))
    }

    fn delete_all(&self, idea_id: &str) -> IncubatorResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| insight_ops::delete_all(conn, idea_id))
    }
}
