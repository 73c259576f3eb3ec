use serde_json::Value;

use crate::constants::DOCUMENT_ID_FIELD;
use crate::errors::ChainsResult;

/// Conjunction of equality filters over dotted field paths.
///
/// An empty query matches every document in a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    filters: Vec<(String, Value)>,
}

impl DocumentQuery {
    /// Match every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match the document with the given `_id`.
    pub fn by_id(id: &str) -> Self {
        Self::all().eq(DOCUMENT_ID_FIELD, id)
    }

    /// Add an equality filter on a dotted path (e.g. `social.twitter`).
    pub fn eq(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.filters.push((path.to_string(), value.into()));
        self
    }

    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// The `_id` this query pins, if any.
    pub fn id(&self) -> Option<&str> {
        self.filters
            .iter()
            .find(|(path, _)| path == DOCUMENT_ID_FIELD)
            .and_then(|(_, value)| value.as_str())
    }

    /// Evaluate the query against a document in memory.
    pub fn matches(&self, document: &Value) -> bool {
        self.filters
            .iter()
            .all(|(path, expected)| lookup_path(document, path) == Some(expected))
    }
}

/// Resolve a dotted path inside a JSON document.
pub fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |node, segment| node.get(segment))
}

/// Read the `_id` of a document.
pub fn document_id(document: &Value) -> Option<&str> {
    document.get(DOCUMENT_ID_FIELD).and_then(Value::as_str)
}

/// Durable, strongly consistent JSON document store.
///
/// `get_many` yields documents in first-insertion order; an upsert keeps a
/// document's original position.
pub trait IDocumentStore: Send + Sync {
    fn exists(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<bool>;
    fn get_one(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<Option<Value>>;
    fn get_many(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<Vec<Value>>;
    /// Upsert by the document's `_id`.
    fn put(&self, collection: &str, document: &Value) -> ChainsResult<()>;
    /// Remove matching documents, returning how many were removed.
    fn remove(&self, collection: &str, query: &DocumentQuery) -> ChainsResult<usize>;
}
