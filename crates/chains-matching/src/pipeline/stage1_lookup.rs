//! Stage 1: Lookup: a venue already in a chain needs no matching.

use chains_core::errors::ChainsResult;
use chains_core::models::Venue;

use super::StageContext;

pub fn lookup_existing(ctx: &StageContext<'_>, venue: &Venue) -> ChainsResult<Option<String>> {
    ctx.chains.lookup_chain_for(&venue.id)
}
