//! Per-venue resolution pipeline.
//!
//! Stage 1: Lookup → Stage 2: Existing chains → Stage 3: Exact match →
//! Stage 4: Fuzzy match → Stage 5: Form or join → Stage 6: Hint seeding.
//! The first stage that produces a match ends the pipeline.

pub mod stage1_lookup;
pub mod stage2_chains;
pub mod stage3_exact;
pub mod stage4_fuzzy;
pub mod stage5_form_or_join;
pub mod stage6_hint;

use tracing::{debug, warn};

use chains_core::config::MatchingConfig;
use chains_core::errors::{ChainsError, ChainsResult};
use chains_core::models::{Resolution, ResolutionStage, ResolutionStats, Venue};

use crate::category_filter::CategoryFilter;
use crate::chain_store::ChainStore;
use crate::pool::VenuePool;
use crate::scoring::SimilarityScorer;
use crate::venue_cache::VenueCache;

/// Shared, read-mostly state every stage works against.
pub struct StageContext<'a> {
    pub chains: &'a ChainStore,
    pub venues: &'a VenueCache,
    pub scorer: &'a SimilarityScorer,
    pub filter: &'a CategoryFilter,
    pub config: &'a MatchingConfig,
}

/// What a matching stage found for the incoming venue.
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    /// An existing chain cleared the chain threshold.
    Chain { chain_id: String, confidence: f64 },
    /// Another venue cleared the venue threshold.
    Venue { venue: Venue, confidence: f64 },
}

/// Run every stage for one venue. The venue must already be cached and pooled.
pub fn run_pipeline(
    ctx: &StageContext<'_>,
    pool: &VenuePool,
    venue: &Venue,
    stats: &mut ResolutionStats,
) -> ChainsResult<Resolution> {
    // Stage 1: Lookup.
    if let Some(chain_id) = stage1_lookup::lookup_existing(ctx, venue)? {
        debug!(venue_id = %venue.id, chain_id = %chain_id, "Stage 1: already chained");
        return Ok(Resolution::Existing { chain_id });
    }

    // Stage 2: Existing chains.
    if let Some(found) = stage2_chains::match_existing_chains(ctx, venue, stats)? {
        debug!(venue_id = %venue.id, "Stage 2: existing chain matched");
        return stage5_form_or_join::form_or_join(ctx, venue, found, ResolutionStage::MatchExistingChains);
    }

    // Stage 3: Exact match.
    if let Some(found) = stage3_exact::exact_match(ctx, venue, stats)? {
        debug!(venue_id = %venue.id, "Stage 3: exact match");
        return stage5_form_or_join::form_or_join(ctx, venue, found, ResolutionStage::ExactMatch);
    }

    // Stage 4: Fuzzy match.
    if let Some(found) = stage4_fuzzy::fuzzy_match(ctx, pool, venue)? {
        debug!(venue_id = %venue.id, "Stage 4: fuzzy match");
        return stage5_form_or_join::form_or_join(ctx, venue, found, ResolutionStage::FuzzyMatch);
    }

    // Stage 6: Hint seeding.
    if let Some(resolution) = stage6_hint::seed_from_hint(ctx, venue)? {
        return Ok(resolution);
    }

    debug!(venue_id = %venue.id, "no stage matched");
    Ok(Resolution::Unassigned)
}

/// Surface a venue that cleared the threshold for more than one chain.
pub(crate) fn report_ambiguity(venue: &Venue, candidates: Vec<String>, stats: &mut ResolutionStats) {
    let ambiguity = ChainsError::AmbiguousChainMatch {
        venue_id: venue.id.clone(),
        candidates,
    };
    warn!(venue_id = %venue.id, detail = %ambiguity, "highest confidence chain wins");
    stats.record_ambiguous(&venue.id);
}
