//! Venue snapshots cached in the `venues` collection.

use std::sync::Arc;

use chains_core::constants::VENUES_COLLECTION;
use chains_core::errors::ChainsResult;
use chains_core::models::{SocialPlatform, Venue};
use chains_core::traits::{DocumentQuery, IDocumentStore};

use crate::codec::{decode, decode_all, encode};

#[derive(Clone)]
pub struct VenueCache {
    store: Arc<dyn IDocumentStore>,
}

impl VenueCache {
    pub fn new(store: Arc<dyn IDocumentStore>) -> Self {
        Self { store }
    }

    pub fn put(&self, venue: &Venue) -> ChainsResult<()> {
        self.store
            .put(VENUES_COLLECTION, &encode(VENUES_COLLECTION, venue)?)
    }

    pub fn get(&self, venue_id: &str) -> ChainsResult<Option<Venue>> {
        self.store
            .get_one(VENUES_COLLECTION, &DocumentQuery::by_id(venue_id))?
            .map(|doc| decode(VENUES_COLLECTION, doc))
            .transpose()
    }

    pub fn contains(&self, venue_id: &str) -> ChainsResult<bool> {
        self.store
            .exists(VENUES_COLLECTION, &DocumentQuery::by_id(venue_id))
    }

    /// The whole corpus in first-cached order.
    pub fn all(&self) -> ChainsResult<Vec<Venue>> {
        self.find(&DocumentQuery::all())
    }

    pub fn find(&self, query: &DocumentQuery) -> ChainsResult<Vec<Venue>> {
        let docs = self.store.get_many(VENUES_COLLECTION, query)?;
        decode_all(VENUES_COLLECTION, docs)
    }

    /// Equality queries for the exact-match stage: name, then url, then
    /// twitter handle when the venue has them.
    pub fn exact_queries(venue: &Venue) -> Vec<DocumentQuery> {
        let mut queries = vec![DocumentQuery::all().eq("name", venue.name.as_str())];
        if let Some(url) = &venue.url {
            queries.push(DocumentQuery::all().eq("url", url.as_str()));
        }
        if let Some(handle) = venue.handle(SocialPlatform::Twitter) {
            queries.push(DocumentQuery::all().eq(SocialPlatform::Twitter.field_path(), handle));
        }
        queries
    }
}
