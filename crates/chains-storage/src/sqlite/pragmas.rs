//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use chains_core::errors::ChainsResult;

use crate::to_store_err;

/// WAL journal, NORMAL sync, busy timeout.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32) -> ChainsResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA foreign_keys = ON;
        "
    ))
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> ChainsResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
