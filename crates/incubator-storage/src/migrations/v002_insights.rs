//! v002: concept_insights. One row per generation version; deleting the
//! concept removes every version.

use rusqlite::Connection;

use incubator_core::errors::IncubatorResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> IncubatorResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS concept_insights (
            id                     INTEGER PRIMARY KEY AUTOINCREMENT,
            idea_id                TEXT NOT NULL,
            generation_version     INTEGER NOT NULL,
            market_insights        TEXT NOT NULL,
            risk_assessment        TEXT NOT NULL,
            implementation_roadmap TEXT NOT NULL,
            is_ai_generated        INTEGER NOT NULL DEFAULT 1,
            generated_at           TEXT NOT NULL,
            last_updated           TEXT NOT NULL,
            FOREIGN KEY (idea_id) REFERENCES concepts(id) ON DELETE CASCADE,
            UNIQUE (idea_id, generation_version)
        );

        CREATE INDEX IF NOT EXISTS idx_insights_idea ON concept_insights(idea_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
