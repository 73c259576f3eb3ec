//! Whole-corpus resolution run.

use tracing::{error, info};

use chains_core::errors::ChainsResult;
use chains_core::models::ResolutionStats;

use crate::engine::Resolver;

/// Resolve every cached venue once, in cache order.
///
/// Recoverable failures skip the venue; a lost store connection ends the run.
/// Returns the tally for this run.
pub fn run_batch(resolver: &mut Resolver) -> ChainsResult<ResolutionStats> {
    let corpus = resolver.load_pool()?;
    info!(venues = corpus.len(), "batch started");

    for venue in &corpus {
        if let Err(e) = resolver.resolve(venue) {
            if !e.is_recoverable() {
                error!(venue_id = %venue.id, error = %e, "batch aborted");
                return Err(e);
            }
        }
    }

    let stats = resolver.take_stats();
    info!(
        processed = stats.processed,
        assigned = stats.assigned(),
        created = stats.created,
        joined = stats.joined,
        unassigned = stats.unassigned,
        excluded = stats.excluded,
        skipped = stats.skipped.len(),
        ambiguous = stats.ambiguous.len(),
        "batch complete"
    );
    Ok(stats)
}
