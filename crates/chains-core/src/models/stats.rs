use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::resolution::{Resolution, ResolutionStage};

/// Tally of a resolution run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub processed: usize,
    pub excluded: usize,
    pub existing: usize,
    pub joined: usize,
    pub created: usize,
    pub unassigned: usize,
    /// Venues skipped after a recoverable failure.
    pub skipped: Vec<String>,
    /// Venues for which more than one chain cleared the threshold.
    pub ambiguous: Vec<String>,
    /// Assignments per stage.
    pub by_stage: BTreeMap<ResolutionStage, usize>,
}

impl ResolutionStats {
    pub fn record(&mut self, resolution: &Resolution) {
        self.processed += 1;
        match resolution {
            Resolution::Excluded => self.excluded += 1,
            Resolution::Existing { .. } => self.existing += 1,
            Resolution::Joined { .. } => self.joined += 1,
            Resolution::Created { .. } => self.created += 1,
            Resolution::Unassigned => self.unassigned += 1,
        }
        if let Some(stage) = resolution.stage() {
            *self.by_stage.entry(stage).or_default() += 1;
        }
    }

    pub fn record_skipped(&mut self, venue_id: &str) {
        self.processed += 1;
        self.skipped.push(venue_id.to_string());
    }

    pub fn record_ambiguous(&mut self, venue_id: &str) {
        self.ambiguous.push(venue_id.to_string());
    }

    /// Venues that ended up in a chain.
    pub fn assigned(&self) -> usize {
        self.existing + self.joined + self.created
    }
}
