//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use incubator_core::errors::IncubatorResult;

use crate::to_storage_err;

/// WAL, NORMAL sync, busy timeout, foreign keys ON.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32) -> IncubatorResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA foreign_keys = ON;
        "
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Pragmas for read-only connections. Journal mode is owned by the writer.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u32) -> IncubatorResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA foreign_keys = ON;
        "
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> IncubatorResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
