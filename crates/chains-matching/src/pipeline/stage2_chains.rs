//! Stage 2: Existing chains: score the venue against every stored chain.

use chains_core::errors::ChainsResult;
use chains_core::models::{Chain, ResolutionStats, Venue};

use super::{report_ambiguity, Match, StageContext};
use crate::scoring::best_of;

pub fn match_existing_chains(
    ctx: &StageContext<'_>,
    venue: &Venue,
    stats: &mut ResolutionStats,
) -> ChainsResult<Option<Match>> {
    let chains = ctx.chains.all_chains()?;
    Ok(best_chain(ctx, venue, &chains, stats))
}

/// Best chain at or above the chain threshold. Candidates are in creation
/// order, so equal confidences resolve to the earliest-created chain.
pub(crate) fn best_chain(
    ctx: &StageContext<'_>,
    venue: &Venue,
    chains: &[Chain],
    stats: &mut ResolutionStats,
) -> Option<Match> {
    let threshold = ctx.config.required_chain_confidence;
    let confidences = ctx.scorer.chain_confidences(venue, chains);

    let passing: Vec<String> = chains
        .iter()
        .zip(&confidences)
        .filter(|(_, c)| **c >= threshold)
        .map(|(chain, _)| chain.id.clone())
        .collect();
    if passing.len() > 1 {
        report_ambiguity(venue, passing, stats);
    }

    let best = best_of(chains, &confidences);
    best.at_least(threshold).map(|chain| Match::Chain {
        chain_id: chain.id.clone(),
        confidence: best.confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ChainAggregate;
    use crate::category_filter::CategoryFilter;
    use crate::chain_store::ChainStore;
    use crate::scoring::SimilarityScorer;
    use crate::venue_cache::VenueCache;
    use chains_core::config::MatchingConfig;
    use chains_storage::MemoryDocumentStore;
    use std::sync::Arc;

    fn chain(names: &[&str]) -> Chain {
        let mut agg = ChainAggregate::new();
        for (i, name) in names.iter().enumerate() {
            agg.add_member(&Venue::new(format!("{name}-{i}"), *name), 1.0);
        }
        agg.into_chain()
    }

    #[test]
    fn ambiguity_is_recorded_and_earliest_wins() {
        let store = Arc::new(MemoryDocumentStore::new());
        let chains = ChainStore::new(store.clone());
        let venues = VenueCache::new(store);
        let (scorer, filter, config) = (
            SimilarityScorer::default(),
            CategoryFilter::without_tree(),
            MatchingConfig::default(),
        );
        let ctx = StageContext {
            chains: &chains,
            venues: &venues,
            scorer: &scorer,
            filter: &filter,
            config: &config,
        };

        let candidates = vec![chain(&["Subway"]), chain(&["Subway"]), chain(&["Greggs"])];
        let mut stats = ResolutionStats::default();
        let found = best_chain(&ctx, &Venue::new("v", "Subway"), &candidates, &mut stats);

        assert_eq!(
            found,
            Some(Match::Chain {
                chain_id: candidates[0].id.clone(),
                confidence: 1.0
            })
        );
        assert_eq!(stats.ambiguous, vec!["v".to_string()]);
    }
}
