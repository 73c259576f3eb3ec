//! Stage 3: Exact match: cached venues sharing the name, url or twitter handle.
//!
//! Queries run in that order and the first one that yields a match wins.
//! Chains reached through the hits are tried first, against the chain
//! threshold; otherwise the best hit overall, against the venue threshold.

use std::collections::HashSet;

use tracing::{debug, warn};

use chains_core::errors::{ChainsError, ChainsResult};
use chains_core::models::{Chain, ResolutionStats, Venue};

use super::stage2_chains::best_chain;
use super::{Match, StageContext};
use crate::venue_cache::VenueCache;

pub fn exact_match(
    ctx: &StageContext<'_>,
    venue: &Venue,
    stats: &mut ResolutionStats,
) -> ChainsResult<Option<Match>> {
    let mut seen_venues: HashSet<String> = HashSet::new();
    let mut seen_chains: HashSet<String> = HashSet::new();

    for query in VenueCache::exact_queries(venue) {
        let hits: Vec<Venue> = ctx
            .venues
            .find(&query)?
            .into_iter()
            .filter(|hit| hit.id != venue.id && !ctx.filter.is_excluded(hit))
            .filter(|hit| seen_venues.insert(hit.id.clone()))
            .collect();
        if hits.is_empty() {
            continue;
        }
        debug!(venue_id = %venue.id, hits = hits.len(), "Stage 3: exact hits");

        let chains = chains_of(ctx, &hits, &mut seen_chains)?;
        if !chains.is_empty() {
            if let Some(found) = best_chain(ctx, venue, &chains, stats) {
                return Ok(Some(found));
            }
        }

        let best = ctx.scorer.find_best_venue_match(venue, &hits);
        if let Some(matched) = best.at_least(ctx.config.required_venue_confidence) {
            return Ok(Some(Match::Venue {
                venue: matched.clone(),
                confidence: best.confidence,
            }));
        }
    }
    Ok(None)
}

/// Distinct chains owning any of the hits, in hit order.
fn chains_of(
    ctx: &StageContext<'_>,
    hits: &[Venue],
    seen: &mut HashSet<String>,
) -> ChainsResult<Vec<Chain>> {
    let mut chains = Vec::new();
    for hit in hits {
        let Some(chain_id) = ctx.chains.lookup_chain_for(&hit.id)? else {
            continue;
        };
        if !seen.insert(chain_id.clone()) {
            continue;
        }
        match ctx.chains.find(&chain_id)? {
            Some(chain) => chains.push(chain),
            None => {
                let stale = ChainsError::ChainNotFound { chain_id };
                warn!(venue_id = %hit.id, error = %stale, "stale lookup entry");
            }
        }
    }
    Ok(chains)
}
