//! Insert, get, update, delete for concepts.

use rusqlite::{params, Connection, OptionalExtension};

use incubator_core::errors::{IncubatorError, IncubatorResult};
use incubator_core::models::{Concept, ConceptUpdate, Stage};

use super::parse_dt;
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "SELECT id, title, description, stage, refined_pitch,
        market_potential, technical_complexity, resource_requirements,
        ai_validated, is_ai_generated, created_at, updated_at
     FROM concepts";

pub fn insert_concept(conn: &Connection, concept: &Concept) -> IncubatorResult<()> {
    conn.execute(
        "INSERT INTO concepts (
            id, title, description, stage, refined_pitch,
            market_potential, technical_complexity, resource_requirements,
            ai_validated, is_ai_generated, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            concept.id,
            concept.title,
            concept.description,
            concept.stage.as_str(),
            concept.refined_pitch,
            concept.market_potential,
            concept.technical_complexity,
            concept.resource_requirements,
            concept.ai_validated as i32,
            concept.is_ai_generated as i32,
            concept.created_at.to_rfc3339(),
            concept.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_concept(conn: &Connection, id: &str) -> IncubatorResult<Option<Concept>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![id], |row| Ok(row_to_concept(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// Read, apply, and write back in one transaction.
pub fn update_concept(
    conn: &Connection,
    id: &str,
    update: &ConceptUpdate,
) -> IncubatorResult<Concept> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("update_concept begin: {e}")))?;

    match update_concept_inner(&tx, id, update) {
        Ok(concept) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("update_concept commit: {e}")))?;
            Ok(concept)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn update_concept_inner(
    conn: &Connection,
    id: &str,
    update: &ConceptUpdate,
) -> IncubatorResult<Concept> {
    let mut concept = get_concept(conn, id)?.ok_or_else(|| IncubatorError::not_found(id))?;
    concept.apply(update)?;
    conn.execute(
        "UPDATE concepts SET
            title = ?2, description = ?3, stage = ?4, refined_pitch = ?5,
            market_potential = ?6, technical_complexity = ?7, resource_requirements = ?8,
            ai_validated = ?9, is_ai_generated = ?10, updated_at = ?11
         WHERE id = ?1",
        params![
            concept.id,
            concept.title,
            concept.description,
            concept.stage.as_str(),
            concept.refined_pitch,
            concept.market_potential,
            concept.technical_complexity,
            concept.resource_requirements,
            concept.ai_validated as i32,
            concept.is_ai_generated as i32,
            concept.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(concept)
}

/// Delete a concept. Insight rows go with it through the foreign key.
pub fn delete_concept(conn: &Connection, id: &str) -> IncubatorResult<bool> {
    let affected = conn
        .execute("DELETE FROM concepts WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(affected > 0)
}

pub fn concept_exists(conn: &Connection, id: &str) -> IncubatorResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM concepts WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn row_to_concept(row: &rusqlite::Row<'_>) -> IncubatorResult<Concept> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let stage_str: String = row.get(3).map_err(get_err)?;
    let stage: Stage = stage_str
        .parse()
        .map_err(|e| to_storage_err(format!("parse stage: {e}")))?;
    let created_at: String = row.get(10).map_err(get_err)?;
    let updated_at: String = row.get(11).map_err(get_err)?;

    Ok(Concept {
        id: row.get(0).map_err(get_err)?,
        title: row.get(1).map_err(get_err)?,
        description: row.get(2).map_err(get_err)?,
        stage,
        refined_pitch: row.get(4).map_err(get_err)?,
        market_potential: row.get(5).map_err(get_err)?,
        technical_complexity: row.get(6).map_err(get_err)?,
        resource_requirements: row.get(7).map_err(get_err)?,
        ai_validated: row.get::<_, i32>(8).map_err(get_err)? != 0,
        is_ai_generated: row.get::<_, i32>(9).map_err(get_err)? != 0,
        created_at: parse_dt(&created_at)?,
        updated_at: parse_dt(&updated_at)?,
    })
}
