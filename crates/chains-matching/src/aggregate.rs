//! In-memory chain aggregate: membership plus the attribute unions derived from it.

use std::ops::Deref;

use chrono::Utc;

use chains_core::models::{Chain, ChainSocial, SocialPlatform, Venue};

use crate::scoring::SimilarityScorer;

/// Mutable view of one chain.
///
/// Attribute sets are only ever rebuilt from the member snapshots, so a value
/// two members shared survives the removal of either one.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainAggregate {
    chain: Chain,
}

impl Default for ChainAggregate {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ChainAggregate {
    type Target = Chain;

    fn deref(&self) -> &Chain {
        &self.chain
    }
}

impl From<Chain> for ChainAggregate {
    fn from(chain: Chain) -> Self {
        Self { chain }
    }
}

impl ChainAggregate {
    /// A fresh, empty chain with a new id.
    pub fn new() -> Self {
        Self {
            chain: Chain::empty(),
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn into_chain(self) -> Chain {
        self.chain
    }

    /// Add a member. Re-adding a present id leaves the sets untouched and
    /// refreshes its confidence. Returns true when the id was new.
    pub fn add_member(&mut self, venue: &Venue, confidence: f64) -> bool {
        self.chain.confidences.insert(venue.id.clone(), confidence);
        if !self.chain.members.insert(venue.id.clone()) {
            return false;
        }
        self.chain.venues.insert(venue.id.clone(), venue.clone());
        absorb(&mut self.chain, venue);
        true
    }

    /// Remove a member and rebuild every attribute set from the rest.
    pub fn remove_member(&mut self, venue_id: &str) -> Option<Venue> {
        if !self.chain.members.remove(venue_id) {
            return None;
        }
        self.chain.confidences.remove(venue_id);
        let removed = self.chain.venues.remove(venue_id);
        self.recompute();
        removed
    }

    /// Rebuild names, urls, handles and categories from the member snapshots.
    pub fn recompute(&mut self) {
        let chain = &mut self.chain;
        chain.names.clear();
        chain.urls.clear();
        chain.social = ChainSocial::default();
        chain.categories.clear();
        let members: Vec<Venue> = chain
            .members
            .iter()
            .filter_map(|id| chain.venues.get(id).cloned())
            .collect();
        for venue in &members {
            absorb(chain, venue);
        }
    }

    /// The chain as it would look without `venue_id`.
    pub fn without(&self, venue_id: &str) -> ChainAggregate {
        let mut view = self.clone();
        view.remove_member(venue_id);
        view
    }

    /// Confidence of a member against the chain minus itself.
    ///
    /// `None` for non-members, and for a sole member, which has nothing to
    /// be compared against.
    pub fn standalone_confidence(&self, scorer: &SimilarityScorer, venue_id: &str) -> Option<f64> {
        if self.chain.len() < 2 {
            return None;
        }
        let venue = self.chain.venues.get(venue_id)?;
        let rest = self.without(venue_id);
        scorer
            .score_venue_against_chain(venue, &rest)
            .map(|score| scorer.confidence(&score))
    }

    /// Drop members whose standalone confidence is below `threshold`.
    ///
    /// Members are removed one at a time, weakest first, and every survivor
    /// is rescored after each removal. The last member is never removed.
    /// Survivors have their recorded confidence refreshed. Returns the
    /// removed snapshots in removal order.
    pub fn prune_below_confidence(&mut self, scorer: &SimilarityScorer, threshold: f64) -> Vec<Venue> {
        let mut removed = Vec::new();
        loop {
            if self.chain.len() < 2 {
                break;
            }
            let scores: Vec<(String, f64)> = self
                .chain
                .members
                .iter()
                .map(|id| {
                    let confidence = self.standalone_confidence(scorer, id).unwrap_or(0.0);
                    (id.clone(), confidence)
                })
                .collect();

            let mut weakest: Option<&(String, f64)> = None;
            for entry in scores.iter().filter(|(_, c)| *c < threshold) {
                if weakest.map_or(true, |(_, w)| entry.1 < *w) {
                    weakest = Some(entry);
                }
            }

            match weakest {
                Some((id, _)) => {
                    if let Some(venue) = self.remove_member(id) {
                        removed.push(venue);
                    }
                }
                None => {
                    for (id, confidence) in scores {
                        self.chain.confidences.insert(id, confidence);
                    }
                    break;
                }
            }
        }
        removed
    }

    /// Bump `updated_at`.
    pub fn touch(&mut self) {
        self.chain.updated_at = Utc::now();
    }
}

fn absorb(chain: &mut Chain, venue: &Venue) {
    chain.names.insert(venue.name.clone());
    if let Some(url) = &venue.url {
        chain.urls.insert(url.clone());
    }
    for platform in SocialPlatform::ALL {
        if let Some(handle) = venue.handle(platform) {
            chain.social.get_mut(platform).insert(handle.to_string());
        }
    }
    chain.categories.extend(venue.categories.iter().cloned());
}
