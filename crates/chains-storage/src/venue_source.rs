//! Venue source answered from the local `venues` collection.
//!
//! Stands in for the remote location API when resolving an offline corpus.

use std::sync::Arc;

use serde_json::Value;

use chains_core::constants::VENUES_COLLECTION;
use chains_core::errors::{ChainsResult, SourceError, StoreError};
use chains_core::models::{GeoPoint, Venue};
use chains_core::traits::{DocumentQuery, IDocumentStore, IVenueSource};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub struct StoreVenueSource {
    store: Arc<dyn IDocumentStore>,
}

impl StoreVenueSource {
    pub fn new(store: Arc<dyn IDocumentStore>) -> Self {
        Self { store }
    }

    fn venues(&self, query: &DocumentQuery) -> ChainsResult<Vec<Venue>> {
        self.store
            .get_many(VENUES_COLLECTION, query)?
            .into_iter()
            .map(decode)
            .collect()
    }
}

fn decode(document: Value) -> ChainsResult<Venue> {
    serde_json::from_value(document).map_err(|e| {
        StoreError::MalformedDocument {
            collection: VENUES_COLLECTION.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Great-circle distance in meters.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

fn name_contains(venue: &Venue, needle: &str) -> bool {
    venue.name.to_lowercase().contains(&needle.to_lowercase())
}

/// Nearby queries match a category id exactly or a name fragment.
fn nearby_query_matches(venue: &Venue, query: &str) -> bool {
    venue.categories.iter().any(|c| c == query) || name_contains(venue, query)
}

impl IVenueSource for StoreVenueSource {
    fn fetch_venue(&self, id: &str) -> ChainsResult<Venue> {
        match self.store.get_one(VENUES_COLLECTION, &DocumentQuery::by_id(id))? {
            Some(doc) => decode(doc),
            None => Err(SourceError::NotFound {
                venue_id: id.to_string(),
            }
            .into()),
        }
    }

    fn search_by_name(&self, name: &str) -> ChainsResult<Vec<Venue>> {
        self.venues(&DocumentQuery::all().eq("name", name))
    }

    fn search_global(&self, query: &str) -> ChainsResult<Vec<Venue>> {
        Ok(self
            .venues(&DocumentQuery::all())?
            .into_iter()
            .filter(|v| name_contains(v, query))
            .collect())
    }

    fn search_nearby(
        &self,
        location: GeoPoint,
        query: Option<&str>,
        radius_meters: u32,
    ) -> ChainsResult<Vec<Venue>> {
        Ok(self
            .venues(&DocumentQuery::all())?
            .into_iter()
            .filter(|v| {
                v.location
                    .is_some_and(|at| haversine_meters(location, at) <= f64::from(radius_meters))
            })
            .filter(|v| query.map_or(true, |q| nearby_query_matches(v, q)))
            .collect())
    }
}
