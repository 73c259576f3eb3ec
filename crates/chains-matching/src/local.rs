//! Nearby alternatives to a venue, split into chain members and independents.

use tracing::warn;

use chains_core::errors::{ChainsResult, SourceError};
use chains_core::models::{Resolution, Venue};
use chains_core::traits::IVenueSource;

use crate::engine::Resolver;

/// Venues near a reference venue, partitioned by chain membership.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalAlternates {
    /// How the reference venue itself resolved.
    pub reference: Resolution,
    /// Alternates that resolved into a chain, with that chain's id.
    pub chained: Vec<(Venue, String)>,
    pub independent: Vec<Venue>,
}

/// Compares a venue with what is around it.
pub struct LocalComparison<'r> {
    resolver: &'r mut Resolver,
    source: &'r dyn IVenueSource,
}

impl<'r> LocalComparison<'r> {
    pub fn new(resolver: &'r mut Resolver, source: &'r dyn IVenueSource) -> Self {
        Self { resolver, source }
    }

    /// Resolve the venue, then search within `radius_meters` for venues
    /// sharing its primary category and resolve each of those. A failing
    /// source yields no alternates.
    pub fn compare(&mut self, venue: &Venue, radius_meters: u32) -> ChainsResult<LocalAlternates> {
        let location = venue.location.ok_or_else(|| SourceError::Malformed {
            reason: format!("venue '{}' has no location", venue.id),
        })?;
        let mut alternates = LocalAlternates {
            reference: self.resolver.resolve(venue)?,
            chained: Vec::new(),
            independent: Vec::new(),
        };

        let nearby = match self
            .source
            .search_nearby(location, venue.primary_category(), radius_meters)
        {
            Ok(nearby) => nearby,
            Err(e) if e.is_recoverable() => {
                warn!(venue_id = %venue.id, error = %e, "nearby search failed");
                return Ok(alternates);
            }
            Err(e) => return Err(e),
        };

        for other in nearby.into_iter().filter(|o| o.id != venue.id) {
            match self.resolver.resolve(&other) {
                Ok(resolution) => match resolution.chain_id() {
                    Some(chain_id) => {
                        let chain_id = chain_id.to_string();
                        alternates.chained.push((other, chain_id));
                    }
                    None => alternates.independent.push(other),
                },
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(alternates)
    }
}

/// Shorthand for a one-off [`LocalComparison::compare`].
pub fn compare_local(
    resolver: &mut Resolver,
    source: &dyn IVenueSource,
    venue: &Venue,
    radius_meters: u32,
) -> ChainsResult<LocalAlternates> {
    LocalComparison::new(resolver, source).compare(venue, radius_meters)
}
