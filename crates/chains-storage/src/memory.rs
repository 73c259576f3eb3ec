//! In-memory document store (tests, dry runs).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use chains_core::errors::{ChainsResult, StoreError};
use chains_core::traits::{document_id, DocumentQuery, IDocumentStore};

use crate::to_store_err;

#[derive(Default)]
struct Collection {
    next_seq: u64,
    /// id -> (insertion sequence, document)
    docs: HashMap<String, (u64, Value)>,
}

impl Collection {
    fn matching<'a>(
        &'a self,
        query: &'a DocumentQuery,
    ) -> impl Iterator<Item = &'a (u64, Value)> + 'a {
        // Pinned ids skip the scan.
        let pinned = query.id().map(|id| self.docs.get(id));
        let candidates: Box<dyn Iterator<Item = &'a (u64, Value)> + 'a> = match pinned {
            Some(hit) => Box::new(hit.into_iter()),
            None => Box::new(self.docs.values()),
        };
        candidates.filter(move |(_, doc)| query.matches(doc))
    }
}

/// Thread-safe in-memory store. Documents keep first-insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ChainsResult<MutexGuard<'_, HashMap<String, Collection>>> {
        self.collections
            .lock()
            .map_err(|e| to_store_err(format!("memory store lock poisoned: {e}")))
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> ChainsResult<usize> {
        Ok(self.lock()?.get(collection).map_or(0, |c| c.docs.len()))
    }
}

impl IDocumentStore for MemoryDocumentStore {
    fn exists(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<bool> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .is_some_and(|c| c.matching(query).next().is_some()))
    }

    fn get_one(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<Option<Value>> {
        let guard = self.lock()?;
        Ok(guard.get(collection).and_then(|c| {
            c.matching(query)
                .min_by_key(|(seq, _)| *seq)
                .map(|(_, doc)| doc.clone())
        }))
    }

    fn get_many(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<Vec<Value>> {
        let guard = self.lock()?;
        let Some(c) = guard.get(collection) else {
            return Ok(Vec::new());
        };
        let mut hits: Vec<&(u64, Value)> = c.matching(query).collect();
        hits.sort_by_key(|(seq, _)| *seq);
        Ok(hits.into_iter().map(|(_, doc)| doc.clone()).collect())
    }

    fn put(&self, collection: &str, document: &Value) -> ChainsResult<()> {
        let id = document_id(document)
            .ok_or_else(|| StoreError::MalformedDocument {
                collection: collection.to_string(),
                reason: "document has no string '_id'".to_string(),
            })?
            .to_string();
        let mut guard = self.lock()?;
        let c = guard.entry(collection.to_string()).or_default();
        match c.docs.get_mut(&id) {
            Some((_, existing)) => *existing = document.clone(),
            None => {
                let seq = c.next_seq;
                c.next_seq += 1;
                c.docs.insert(id, (seq, document.clone()));
            }
        }
        Ok(())
    }

    fn remove(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<usize> {
        let mut guard = self.lock()?;
        let Some(c) = guard.get_mut(collection) else {
            return Ok(0);
        };
        let before = c.docs.len();
        c.docs.retain(|_, (_, doc)| !query.matches(doc));
        Ok(before - c.docs.len())
    }
}
