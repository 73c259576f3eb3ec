//! Stage 4: Fuzzy match: pairwise scoring against the unchained pool.

use chains_core::errors::ChainsResult;
use chains_core::models::Venue;
use tracing::debug;

use super::{Match, StageContext};
use crate::pool::VenuePool;

pub fn fuzzy_match(
    ctx: &StageContext<'_>,
    pool: &VenuePool,
    venue: &Venue,
) -> ChainsResult<Option<Match>> {
    let chained = ctx.chains.chained_venue_ids()?;
    let candidates = pool.candidates_for(venue, &chained);
    debug!(venue_id = %venue.id, candidates = candidates.len(), "Stage 4: fuzzy candidates");

    let best = ctx.scorer.find_best_venue_match(venue, &candidates);
    Ok(best
        .at_least(ctx.config.required_venue_confidence)
        .map(|matched| Match::Venue {
            venue: matched.clone(),
            confidence: best.confidence,
        }))
}
