//! SQLite-backed document store: one write connection behind a mutex,
//! migrations at open.

pub mod migrations;
pub mod pragmas;
pub mod queries;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, ErrorCode};
use serde_json::Value;

use chains_core::config::StorageConfig;
use chains_core::errors::{ChainsError, ChainsResult, StoreError};
use chains_core::traits::{DocumentQuery, IDocumentStore};

use crate::to_store_err;

/// Map a rusqlite error, classifying unusable databases as a lost connection.
pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> ChainsError {
    match e.sqlite_error_code() {
        Some(
            ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::SystemIoFailure
            | ErrorCode::DatabaseCorrupt,
        ) => StoreError::ConnectionLost {
            details: e.to_string(),
        }
        .into(),
        _ => to_store_err(e.to_string()),
    }
}

/// Document store persisted in a single SQLite table.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
    wal_active: bool,
}

impl SqliteDocumentStore {
    /// Open (or create) a database file and run pending migrations.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> ChainsResult<Self> {
        let conn = Connection::open(path).map_err(map_sqlite_err)?;
        let mut store = Self::initialize(conn, busy_timeout_ms)?;
        store.wal_active = store.with_conn(pragmas::verify_wal_mode)?;
        if !store.wal_active {
            tracing::warn!(path = %path.display(), "WAL journal not active");
        }
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> ChainsResult<Self> {
        let conn = Connection::open_in_memory().map_err(map_sqlite_err)?;
        Self::initialize(conn, 0)
    }

    pub fn from_config(config: &StorageConfig) -> ChainsResult<Self> {
        Self::open(Path::new(&config.db_path), config.busy_timeout_ms)
    }

    fn initialize(conn: Connection, busy_timeout_ms: u32) -> ChainsResult<Self> {
        pragmas::apply_pragmas(&conn, busy_timeout_ms)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            wal_active: false,
        })
    }

    /// Acquire the connection and execute a closure with it.
    pub fn with_conn<F, T>(&self, f: F) -> ChainsResult<T>
    where
        F: FnOnce(&Connection) -> ChainsResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| StoreError::ConnectionLost {
            details: format!("connection lock poisoned: {e}"),
        })?;
        f(&guard)
    }

    /// Whether the file-backed journal is in WAL mode. Always false in memory.
    pub fn wal_active(&self) -> bool {
        self.wal_active
    }

    /// Current schema version.
    pub fn schema_version(&self) -> ChainsResult<u32> {
        self.with_conn(migrations::current_version)
    }
}

impl IDocumentStore for SqliteDocumentStore {
    fn exists(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<bool> {
        self.with_conn(|conn| Ok(!queries::select(conn, collection, query, Some(1))?.is_empty()))
    }

    fn get_one(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<Option<Value>> {
        self.with_conn(|conn| {
            Ok(queries::select(conn, collection, query, Some(1))?
                .into_iter()
                .next())
        })
    }

    fn get_many(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<Vec<Value>> {
        self.with_conn(|conn| queries::select(conn, collection, query, None))
    }

    fn put(&self, collection: &str, document: &Value) -> ChainsResult<()> {
        self.with_conn(|conn| queries::upsert(conn, collection, document))
    }

    fn remove(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<usize> {
        self.with_conn(|conn| queries::delete(conn, collection, query))
    }
}
