use serde_json::json;

use chains_core::traits::{DocumentQuery, IDocumentStore};
use chains_storage::SqliteDocumentStore;

#[test]
fn documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chains.db");

    {
        let store = SqliteDocumentStore::open(&path, 5_000).unwrap();
        store
            .put("chains", &json!({"_id": "c1", "names": ["Tesco"]}))
            .unwrap();
    }

    let store = SqliteDocumentStore::open(&path, 5_000).unwrap();
    let doc = store
        .get_one("chains", &DocumentQuery::by_id("c1"))
        .unwrap()
        .unwrap();
    assert_eq!(doc["names"][0], "Tesco");
}

#[test]
fn migrations_are_applied_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chains.db");

    let first = SqliteDocumentStore::open(&path, 5_000).unwrap();
    assert_eq!(first.schema_version().unwrap(), 2);
    drop(first);

    let second = SqliteDocumentStore::open(&path, 5_000).unwrap();
    assert_eq!(second.schema_version().unwrap(), 2);
}

#[test]
fn file_backed_store_uses_wal() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteDocumentStore::open(&dir.path().join("wal.db"), 1_000).unwrap();
    assert!(store.wal_active());
}

#[test]
fn in_memory_store_reports_no_wal() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    assert!(!store.wal_active());
}
