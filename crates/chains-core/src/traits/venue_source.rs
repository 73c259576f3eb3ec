use crate::errors::ChainsResult;
use crate::models::{GeoPoint, Venue};

/// Remote location-data API, already converted to typed venues.
///
/// Transient failures surface as `SourceError::Unavailable`; callers treat
/// them as "no match from this source" and continue.
pub trait IVenueSource: Send + Sync {
    fn fetch_venue(&self, id: &str) -> ChainsResult<Venue>;
    fn search_by_name(&self, name: &str) -> ChainsResult<Vec<Venue>>;
    fn search_global(&self, query: &str) -> ChainsResult<Vec<Venue>>;
    fn search_nearby(
        &self,
        location: GeoPoint,
        query: Option<&str>,
        radius_meters: u32,
    ) -> ChainsResult<Vec<Venue>>;
}
