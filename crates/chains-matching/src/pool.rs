//! Fuzzy-match candidate pool with an explicit record of completed comparisons.

use std::collections::{HashMap, HashSet};

use chains_core::models::Venue;

#[derive(Debug, Clone)]
struct Entry {
    venue: Venue,
    seq: u64,
    /// Pool clock when this venue finished its own comparison pass.
    compared_at: Option<u64>,
}

/// Venues eligible for pairwise comparison, in insertion order.
///
/// When a venue finishes resolving it has been compared against every venue
/// pooled before that moment, so those pairs are never scored again. Venues
/// pooled afterwards still see it as a candidate.
#[derive(Debug, Clone, Default)]
pub struct VenuePool {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    clock: u64,
}

impl VenuePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, venue_id: &str) -> bool {
        self.index.contains_key(venue_id)
    }

    /// Add a venue, or refresh its snapshot. Returns true when it was new.
    pub fn insert(&mut self, venue: Venue) -> bool {
        if let Some(&i) = self.index.get(&venue.id) {
            self.entries[i].venue = venue;
            return false;
        }
        self.index.insert(venue.id.clone(), self.entries.len());
        self.entries.push(Entry {
            venue,
            seq: self.clock,
            compared_at: None,
        });
        self.clock += 1;
        true
    }

    /// Record that `venue_id` has been compared against everything pooled so far.
    pub fn mark_compared(&mut self, venue_id: &str) {
        if let Some(&i) = self.index.get(venue_id) {
            self.entries[i].compared_at = Some(self.clock);
        }
    }

    pub fn is_compared(&self, venue_id: &str) -> bool {
        self.index
            .get(venue_id)
            .is_some_and(|&i| self.entries[i].compared_at.is_some())
    }

    /// Snapshots in pool order.
    pub fn venues(&self) -> impl Iterator<Item = &Venue> {
        self.entries.iter().map(|e| &e.venue)
    }

    /// Pool members `venue` still needs to be scored against: not itself,
    /// not chained, and not a member whose own pass already covered it.
    pub fn candidates_for(&self, venue: &Venue, chained: &HashSet<String>) -> Vec<Venue> {
        let own_seq = self.index.get(&venue.id).map(|&i| self.entries[i].seq);
        self.entries
            .iter()
            .filter(|e| e.venue.id != venue.id && !chained.contains(&e.venue.id))
            .filter(|e| match (own_seq, e.compared_at) {
                (Some(seq), Some(at)) => seq >= at,
                _ => true,
            })
            .map(|e| e.venue.clone())
            .collect()
    }
}
