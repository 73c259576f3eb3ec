//! Typed documents to and from the store's JSON values.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use chains_core::errors::{ChainsResult, StoreError};

pub(crate) fn encode<T: Serialize>(collection: &str, item: &T) -> ChainsResult<Value> {
    serde_json::to_value(item).map_err(|e| {
        StoreError::Serialization {
            collection: collection.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

pub(crate) fn decode<T: DeserializeOwned>(collection: &str, document: Value) -> ChainsResult<T> {
    serde_json::from_value(document).map_err(|e| {
        StoreError::MalformedDocument {
            collection: collection.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

pub(crate) fn decode_all<T: DeserializeOwned>(collection: &str, documents: Vec<Value>) -> ChainsResult<Vec<T>> {
    documents.into_iter().map(|d| decode(collection, d)).collect()
}
