//! Contract tests run against every document store backend.

use proptest::prelude::*;
use serde_json::json;

use chains_core::traits::{document_id, DocumentQuery, IDocumentStore};
use chains_storage::{MemoryDocumentStore, SqliteDocumentStore};

fn backends() -> Vec<(&'static str, Box<dyn IDocumentStore>)> {
    vec![
        ("memory", Box::new(MemoryDocumentStore::new()) as Box<dyn IDocumentStore>),
        (
            "sqlite",
            Box::new(SqliteDocumentStore::open_in_memory().unwrap()) as Box<dyn IDocumentStore>,
        ),
    ]
}

fn ids(docs: &[serde_json::Value]) -> Vec<String> {
    docs.iter()
        .filter_map(|d| document_id(d).map(str::to_string))
        .collect()
}

#[test]
fn put_then_get_by_id() {
    for (name, store) in backends() {
        store
            .put("venues", &json!({"_id": "v1", "name": "Starbucks"}))
            .unwrap();
        let doc = store
            .get_one("venues", &DocumentQuery::by_id("v1"))
            .unwrap()
            .unwrap_or_else(|| panic!("{name}: document missing"));
        assert_eq!(doc["name"], "Starbucks", "{name}");
        assert!(store.exists("venues", &DocumentQuery::by_id("v1")).unwrap());
        assert!(!store.exists("venues", &DocumentQuery::by_id("v2")).unwrap());
    }
}

#[test]
fn nested_equality_filters() {
    for (name, store) in backends() {
        store
            .put("venues", &json!({"_id": "a", "name": "Costa", "social": {"twitter": "costacoffee"}}))
            .unwrap();
        store
            .put("venues", &json!({"_id": "b", "name": "Costa", "social": {"twitter": "other"}}))
            .unwrap();
        store
            .put("venues", &json!({"_id": "c", "name": "Greggs"}))
            .unwrap();

        let by_name = store
            .get_many("venues", &DocumentQuery::all().eq("name", "Costa"))
            .unwrap();
        assert_eq!(ids(&by_name), vec!["a", "b"], "{name}");

        let by_handle = store
            .get_many(
                "venues",
                &DocumentQuery::all().eq("name", "Costa").eq("social.twitter", "costacoffee"),
            )
            .unwrap();
        assert_eq!(ids(&by_handle), vec!["a"], "{name}");
    }
}

#[test]
fn upsert_replaces_body_and_keeps_order() {
    for (name, store) in backends() {
        store.put("chains", &json!({"_id": "c1", "n": 1})).unwrap();
        store.put("chains", &json!({"_id": "c2", "n": 2})).unwrap();
        store.put("chains", &json!({"_id": "c1", "n": 10})).unwrap();

        let all = store.get_many("chains", &DocumentQuery::all()).unwrap();
        assert_eq!(ids(&all), vec!["c1", "c2"], "{name}");
        assert_eq!(all[0]["n"], 10, "{name}");
    }
}

#[test]
fn collections_are_isolated() {
    for (name, store) in backends() {
        store.put("venues", &json!({"_id": "x"})).unwrap();
        assert!(
            store.get_one("chains", &DocumentQuery::by_id("x")).unwrap().is_none(),
            "{name}"
        );
    }
}

#[test]
fn remove_by_query_returns_count() {
    for (name, store) in backends() {
        store
            .put("chain_id_lookup", &json!({"_id": "v1", "chain_id": "c"}))
            .unwrap();
        store
            .put("chain_id_lookup", &json!({"_id": "v2", "chain_id": "c"}))
            .unwrap();
        store
            .put("chain_id_lookup", &json!({"_id": "v3", "chain_id": "d"}))
            .unwrap();

        let removed = store
            .remove("chain_id_lookup", &DocumentQuery::all().eq("chain_id", "c"))
            .unwrap();
        assert_eq!(removed, 2, "{name}");
        let left = store.get_many("chain_id_lookup", &DocumentQuery::all()).unwrap();
        assert_eq!(ids(&left), vec!["v3"], "{name}");
    }
}

#[test]
fn documents_without_id_are_rejected() {
    for (name, store) in backends() {
        assert!(store.put("venues", &json!({"name": "anon"})).is_err(), "{name}");
    }
}

#[derive(Debug, Clone)]
enum Op {
    Put(u8, u8),
    Remove(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6, any::<u8>()).prop_map(|(id, n)| Op::Put(id, n)),
        (0u8..6).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn backends_agree_with_insertion_order_model(ops in prop::collection::vec(op_strategy(), 1..40)) {
        for (name, store) in backends() {
            let mut model: Vec<(String, u8)> = Vec::new();
            for op in &ops {
                match op {
                    Op::Put(id, n) => {
                        let id = format!("d{id}");
                        store.put("docs", &json!({"_id": id, "n": n})).unwrap();
                        match model.iter_mut().find(|(m, _)| *m == id) {
                            Some(entry) => entry.1 = *n,
                            None => model.push((id, *n)),
                        }
                    }
                    Op::Remove(id) => {
                        let id = format!("d{id}");
                        let removed = store.remove("docs", &DocumentQuery::by_id(&id)).unwrap();
                        let before = model.len();
                        model.retain(|(m, _)| *m != id);
                        prop_assert_eq!(removed, before - model.len(), "{}", name);
                    }
                }
            }
            let all = store.get_many("docs", &DocumentQuery::all()).unwrap();
            let expected: Vec<String> = model.iter().map(|(id, _)| id.clone()).collect();
            prop_assert_eq!(ids(&all), expected, "{}", name);
            for (doc, (_, n)) in all.iter().zip(&model) {
                prop_assert_eq!(&doc["n"], &json!(n), "{}", name);
            }
        }
    }
}
