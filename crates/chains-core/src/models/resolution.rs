//! Outcome of resolving one venue.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resolver stages, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    LookupExisting,
    MatchExistingChains,
    ExactMatch,
    FuzzyMatch,
    ChainHint,
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionStage::LookupExisting => "lookup_existing",
            ResolutionStage::MatchExistingChains => "match_existing_chains",
            ResolutionStage::ExactMatch => "exact_match",
            ResolutionStage::FuzzyMatch => "fuzzy_match",
            ResolutionStage::ChainHint => "chain_hint",
        };
        f.write_str(s)
    }
}

/// Terminal state of the per-venue pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// Primary category is a home or residence; never matched.
    Excluded,
    /// Already assigned before this run.
    Existing { chain_id: String },
    /// Added to an existing chain.
    Joined {
        chain_id: String,
        stage: ResolutionStage,
        confidence: f64,
    },
    /// A new chain was created. `partner_id` is absent for hint-seeded chains.
    Created {
        chain_id: String,
        stage: ResolutionStage,
        confidence: f64,
        partner_id: Option<String>,
    },
    /// No stage matched.
    Unassigned,
}

impl Resolution {
    pub fn chain_id(&self) -> Option<&str> {
        match self {
            Resolution::Existing { chain_id }
            | Resolution::Joined { chain_id, .. }
            | Resolution::Created { chain_id, .. } => Some(chain_id),
            Resolution::Excluded | Resolution::Unassigned => None,
        }
    }

    pub fn stage(&self) -> Option<ResolutionStage> {
        match self {
            Resolution::Existing { .. } => Some(ResolutionStage::LookupExisting),
            Resolution::Joined { stage, .. } | Resolution::Created { stage, .. } => Some(*stage),
            Resolution::Excluded | Resolution::Unassigned => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.chain_id().is_some()
    }
}
