//! v001: concepts.

use rusqlite::Connection;

use incubator_core::errors::IncubatorResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> IncubatorResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS concepts (
            id                    TEXT PRIMARY KEY,
            title                 TEXT NOT NULL,
            description           TEXT NOT NULL,
            stage                 TEXT NOT NULL DEFAULT 'concept',
            refined_pitch         TEXT,
            market_potential      REAL NOT NULL DEFAULT 5.0,
            technical_complexity  REAL NOT NULL DEFAULT 5.0,
            resource_requirements REAL NOT NULL DEFAULT 5.0,
            ai_validated          INTEGER NOT NULL DEFAULT 0,
            is_ai_generated       INTEGER NOT NULL DEFAULT 0,
            created_at            TEXT NOT NULL,
            updated_at            TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_concepts_stage ON concepts(stage);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
