//! Stage 6: Hint seeding: the data source says this venue is a chain.

use chains_core::errors::ChainsResult;
use chains_core::models::{Resolution, ResolutionStage, Venue};
use tracing::debug;

use super::StageContext;

/// Confidence recorded for a hint-seeded member.
pub const HINT_CONFIDENCE: f64 = 1.0;

/// Seed a single-member chain when hinting is enabled and the venue carries the hint.
pub fn seed_from_hint(ctx: &StageContext<'_>, venue: &Venue) -> ChainsResult<Option<Resolution>> {
    if !(ctx.config.seed_chain_from_hint && venue.chain_hint) {
        return Ok(None);
    }
    let chain = ctx.chains.create(&[(venue, HINT_CONFIDENCE)])?;
    debug!(venue_id = %venue.id, chain_id = %chain.id, "Stage 6: seeded from hint");
    Ok(Some(Resolution::Created {
        chain_id: chain.id,
        stage: ResolutionStage::ChainHint,
        confidence: HINT_CONFIDENCE,
        partner_id: None,
    }))
}
