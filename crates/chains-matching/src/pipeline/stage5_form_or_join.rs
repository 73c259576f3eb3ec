//! Stage 5: Form or join: turn a match into a chain mutation.

use chains_core::errors::ChainsResult;
use chains_core::models::{Resolution, ResolutionStage, Venue};

use super::{Match, StageContext};

/// Join the matched chain, join the matched venue's chain, or pair the two
/// venues into a new chain with the same confidence recorded for both.
pub fn form_or_join(
    ctx: &StageContext<'_>,
    venue: &Venue,
    found: Match,
    stage: ResolutionStage,
) -> ChainsResult<Resolution> {
    match found {
        Match::Chain {
            chain_id,
            confidence,
        } => join(ctx, venue, chain_id, confidence, stage),
        Match::Venue {
            venue: partner,
            confidence,
        } => match ctx.chains.lookup_chain_for(&partner.id)? {
            Some(chain_id) => join(ctx, venue, chain_id, confidence, stage),
            None => {
                let chain = ctx
                    .chains
                    .create(&[(&partner, confidence), (venue, confidence)])?;
                Ok(Resolution::Created {
                    chain_id: chain.id,
                    stage,
                    confidence,
                    partner_id: Some(partner.id),
                })
            }
        },
    }
}

fn join(
    ctx: &StageContext<'_>,
    venue: &Venue,
    chain_id: String,
    confidence: f64,
    stage: ResolutionStage,
) -> ChainsResult<Resolution> {
    ctx.chains.add_to_chain(&chain_id, &[(venue, confidence)])?;
    Ok(Resolution::Joined {
        chain_id,
        stage,
        confidence,
    })
}
