//! Schema migrations using PRAGMA user_version.

pub mod v001_documents;
pub mod v002_lookup_index;

use rusqlite::Connection;

use chains_core::errors::{ChainsResult, StoreError};

const MIGRATIONS: &[(&str, u32)] = &[
    (v001_documents::MIGRATION_SQL, 1),
    (v002_lookup_index::MIGRATION_SQL, 2),
];

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> ChainsResult<()> {
    apply(conn, MIGRATIONS)
}

/// Apply each pending step in its own transaction together with its version bump.
fn apply(conn: &Connection, migrations: &[(&str, u32)]) -> ChainsResult<()> {
    let current = current_version(conn)?;

    for &(sql, version) in migrations {
        if current >= version {
            continue;
        }
        let failed = |e: rusqlite::Error| StoreError::MigrationFailed {
            version,
            reason: e.to_string(),
        };
        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.pragma_update(None, "user_version", version)
            .map_err(failed)?;
        tx.commit().map_err(failed)?;
        tracing::info!(version = version, "applied migration");
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> ChainsResult<u32> {
    let version = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StoreError::MigrationFailed {
            version: 0,
            reason: e.to_string(),
        })?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            > 0
    }

    #[test]
    fn failed_step_rolls_back_with_its_version() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let broken: &[(&str, u32)] = &[(
            "CREATE TABLE partial (x INTEGER); SELECT * FROM missing_table;",
            3,
        )];
        let err = apply(&conn, broken).unwrap_err();
        assert!(err.to_string().contains("version 3"));
        assert_eq!(current_version(&conn).unwrap(), 2);
        assert!(!table_exists(&conn, "partial"));
    }

    #[test]
    fn rerun_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(current_version(&conn).unwrap(), 2);
        assert!(table_exists(&conn, "documents"));
    }
}
