//! Schema migrations, tracked in `schema_version`. Each migration runs in
//! its own transaction and is skipped once recorded.

pub mod v001_concepts;
pub mod v002_insights;

use rusqlite::{params, Connection};
use tracing::info;

use incubator_core::errors::{IncubatorError, IncubatorResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> IncubatorResult<()>;

const MIGRATIONS: &[(u32, &str, MigrationFn)] = &[
    (1, "concepts", v001_concepts::migrate),
    (2, "insights", v002_insights::migrate),
];

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = 2;

/// Apply every pending migration. Returns how many were applied.
pub fn run_migrations(conn: &Connection) -> IncubatorResult<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    let mut applied = 0;
    for (version, name, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        apply(conn, *version, name, *migrate)?;
        info!(version, name, "applied schema migration");
        applied += 1;
    }
    Ok(applied)
}

pub fn current_version(conn: &Connection) -> IncubatorResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn apply(conn: &Connection, version: u32, name: &str, migrate: MigrationFn) -> IncubatorResult<()> {
    let failed = |reason: String| {
        IncubatorError::Storage(StorageError::MigrationFailed { version, reason })
    };
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| failed(e.to_string()))?;
    let result = migrate(&tx).and_then(|()| {
        tx.execute(
            "INSERT INTO schema_version (version, name) VALUES (?1, ?2)",
            params![version, name],
        )
        .map(|_| ())
        .map_err(|e| to_storage_err(e.to_string()))
    });
    match result {
        Ok(()) => tx.commit().map_err(|e| failed(e.to_string())),
        Err(e) => {
            let _ = tx.rollback();
            Err(failed(e.to_string()))
        }
    }
}
