use serde::{Deserialize, Serialize};

use super::defaults;

/// Resolver thresholds and stage switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum venue-to-chain confidence to join an existing chain.
    pub required_chain_confidence: f64,
    /// Minimum pairwise confidence to form or join a chain through another venue.
    pub required_venue_confidence: f64,
    /// Name similarity above which the category signal is computed.
    pub category_gate: f64,
    /// Add the signed category signal to the thresholded confidence.
    pub include_category_in_confidence: bool,
    /// Seed a single-member chain when the source flags an unmatched venue as a chain.
    pub seed_chain_from_hint: bool,
    /// Run a global name search through the venue source before resolving.
    pub global_search: bool,
    /// Score candidates on the rayon pool.
    pub parallel_scoring: bool,
    /// Default threshold for chain pruning.
    pub prune_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            required_chain_confidence: defaults::DEFAULT_REQUIRED_CHAIN_CONFIDENCE,
            required_venue_confidence: defaults::DEFAULT_REQUIRED_VENUE_CONFIDENCE,
            category_gate: defaults::DEFAULT_CATEGORY_GATE,
            include_category_in_confidence: defaults::DEFAULT_INCLUDE_CATEGORY_IN_CONFIDENCE,
            seed_chain_from_hint: defaults::DEFAULT_SEED_CHAIN_FROM_HINT,
            global_search: defaults::DEFAULT_GLOBAL_SEARCH,
            parallel_scoring: defaults::DEFAULT_PARALLEL_SCORING,
            prune_threshold: defaults::DEFAULT_PRUNE_THRESHOLD,
        }
    }
}
