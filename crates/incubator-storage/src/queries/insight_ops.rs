//! Versioned insight rows: optimistic append, current, history, delete.

use rusqlite::{params, Connection, OptionalExtension};

use incubator_core::content::ContentBlock;
use incubator_core::errors::{IncubatorError, IncubatorResult, StorageError};
use incubator_core::models::{InsightRecord, NewInsightRecord};

use super::concept_crud::concept_exists;
use super::parse_dt;
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "SELECT idea_id, generation_version, market_insights,
        risk_assessment, implementation_roadmap, is_ai_generated, generated_at, last_updated
     FROM concept_insights";

/// Append `record` as version `previous_version + 1`, atomically with the
/// check that `previous_version` is still current.
pub fn append_insight(conn: &Connection, record: &NewInsightRecord) -> IncubatorResult<InsightRecord> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("append_insight begin: {e}")))?;

    match append_insight_inner(&tx, record) {
        Ok(stored) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("append_insight commit: {e}")))?;
            Ok(stored)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn append_insight_inner(conn: &Connection, record: &NewInsightRecord) -> IncubatorResult<InsightRecord> {
    if !concept_exists(conn, &record.idea_id)? {
        return Err(IncubatorError::not_found(&record.idea_id));
    }
    let actual = current_version(conn, &record.idea_id)?;
    if actual != record.previous_version {
        return Err(conflict(record, actual));
    }

    let stored = record.clone().into_record();
    let result = conn.execute(
        "INSERT INTO concept_insights (
            idea_id, generation_version, market_insights, risk_assessment,
            implementation_roadmap, is_ai_generated, generated_at, last_updated
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            stored.idea_id,
            stored.generation_version,
            blocks_to_json(&stored.market_insights)?,
            blocks_to_json(&stored.risk_assessment)?,
            blocks_to_json(&stored.implementation_roadmap)?,
            stored.is_ai_generated as i32,
            stored.generated_at.to_rfc3339(),
            stored.last_updated.to_rfc3339(),
        ],
    );
    match result {
        Ok(_) => Ok(stored),
        // Another connection won the UNIQUE(idea_id, generation_version) race.
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(conflict(record, record.next_version()))
        }
        Err(e) => Err(to_storage_err(e.to_string())),
    }
}

pub fn current_version(conn: &Connection, idea_id: &str) -> IncubatorResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(generation_version), 0) FROM concept_insights WHERE idea_id = ?1",
        params![idea_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_current(conn: &Connection, idea_id: &str) -> IncubatorResult<Option<InsightRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE idea_id = ?1 ORDER BY generation_version DESC LIMIT 1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![idea_id], |row| Ok(row_to_record(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

pub fn get_history(conn: &Connection, idea_id: &str) -> IncubatorResult<Vec<InsightRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE idea_id = ?1 ORDER BY generation_version ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![idea_id], |row| Ok(row_to_record(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(records)
}

pub fn delete_all(conn: &Connection, idea_id: &str) -> IncubatorResult<usize> {
    conn.execute(
        "DELETE FROM concept_insights WHERE idea_id = ?1",
        params![idea_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn conflict(record: &NewInsightRecord, actual: u32) -> IncubatorError {
    StorageError::VersionConflict {
        idea_id: record.idea_id.clone(),
        expected: record.previous_version,
        actual,
    }
    .into()
}

fn blocks_to_json(blocks: &[ContentBlock]) -> IncubatorResult<String> {
    serde_json::to_string(blocks).map_err(|e| {
        StorageError::Serialization {
            reason: e.to_string(),
        }
        .into()
    })
}

fn blocks_from_json(json: &str) -> IncubatorResult<Vec<ContentBlock>> {
    serde_json::from_str(json).map_err(|e| {
        StorageError::Serialization {
            reason: format!("parse content blocks: {e}"),
        }
        .into()
    })
}

fn row_to_record(row: &rusqlite::Row<'_>) -> IncubatorResult<InsightRecord> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let market: String = row.get(2).map_err(get_err)?;
    let risk: String = row.get(3).map_err(get_err)?;
    let roadmap: String = row.get(4).map_err(get_err)?;
    let generated_at: String = row.get(6).map_err(get_err)?;
    let last_updated: String = row.get(7).map_err(get_err)?;

    Ok(InsightRecord {
        idea_id: row.get(0).map_err(get_err)?,
        generation_version: row.get(1).map_err(get_err)?,
        market_insights: blocks_from_json(&market)?,
        risk_assessment: blocks_from_json(&risk)?,
        implementation_roadmap: blocks_from_json(&roadmap)?,
        is_ai_generated: row.get::<_, i32>(5).map_err(get_err)? != 0,
        generated_at: parse_dt(&generated_at)?,
        last_updated: parse_dt(&last_updated)?,
    })
}
