//! Chain persistence and the venue→chain inverse index.
//!
//! The store is the only place the at-most-one-chain invariant is enforced:
//! every save checks each member's lookup entry before anything is written.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use chains_core::constants::{CHAINS_COLLECTION, LOOKUP_COLLECTION};
use chains_core::errors::{ChainsError, ChainsResult};
use chains_core::models::{Chain, Venue, VenueChainLookup};
use chains_core::traits::{DocumentQuery, IDocumentStore};

use crate::aggregate::ChainAggregate;
use crate::codec::{decode, decode_all, encode};
use crate::scoring::SimilarityScorer;

/// Outcome of pruning one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneOutcome {
    /// Ids removed, weakest first.
    pub removed: Vec<String>,
    /// The chain after pruning.
    pub chain: Chain,
}

/// Outcome of a store-wide lookup reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub chains: usize,
    /// Lookup entries written for members whose entry was missing or stale.
    pub repaired: usize,
    /// Lookup entries dropped because their chain no longer lists the venue.
    pub orphans_removed: usize,
    /// Members left alone because another live chain already owns them.
    pub conflicts: Vec<String>,
}

/// Chain documents plus the inverse lookup, over an injected document store.
#[derive(Clone)]
pub struct ChainStore {
    store: Arc<dyn IDocumentStore>,
}

impl ChainStore {
    pub fn new(store: Arc<dyn IDocumentStore>) -> Self {
        Self { store }
    }

    pub fn document_store(&self) -> &Arc<dyn IDocumentStore> {
        &self.store
    }

    pub fn lookup(&self, venue_id: &str) -> ChainsResult<Option<VenueChainLookup>> {
        self.store
            .get_one(LOOKUP_COLLECTION, &DocumentQuery::by_id(venue_id))?
            .map(|doc| decode(LOOKUP_COLLECTION, doc))
            .transpose()
    }

    /// The lookup entry for a venue, if a live chain backs it.
    ///
    /// Entries left behind by an interrupted mutation (chain gone, or no
    /// longer listing the venue) read as absent; the next `save` rewrites them.
    pub fn live_lookup(&self, venue_id: &str) -> ChainsResult<Option<VenueChainLookup>> {
        match self.lookup(venue_id)? {
            Some(entry) if self.owns(&entry.chain_id, venue_id)? => Ok(Some(entry)),
            Some(entry) => {
                debug!(venue_id, chain_id = %entry.chain_id, "stale lookup ignored");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Chain id a venue currently resolves to.
    pub fn lookup_chain_for(&self, venue_id: &str) -> ChainsResult<Option<String>> {
        Ok(self.live_lookup(venue_id)?.map(|l| l.chain_id))
    }

    pub fn find(&self, chain_id: &str) -> ChainsResult<Option<Chain>> {
        self.store
            .get_one(CHAINS_COLLECTION, &DocumentQuery::by_id(chain_id))?
            .map(|doc| decode(CHAINS_COLLECTION, doc))
            .transpose()
    }

    pub fn load(&self, chain_id: &str) -> ChainsResult<ChainAggregate> {
        self.find(chain_id)?
            .map(ChainAggregate::from)
            .ok_or_else(|| ChainsError::ChainNotFound {
                chain_id: chain_id.to_string(),
            })
    }

    /// Every stored chain, oldest first.
    pub fn all_chains(&self) -> ChainsResult<Vec<Chain>> {
        let docs = self.store.get_many(CHAINS_COLLECTION, &DocumentQuery::all())?;
        decode_all(CHAINS_COLLECTION, docs)
    }

    /// Ids of every venue whose lookup entry a live chain backs.
    pub fn chained_venue_ids(&self) -> ChainsResult<HashSet<String>> {
        let chains: HashMap<String, Chain> = self
            .all_chains()?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let docs = self.store.get_many(LOOKUP_COLLECTION, &DocumentQuery::all())?;
        let lookups: Vec<VenueChainLookup> = decode_all(LOOKUP_COLLECTION, docs)?;
        Ok(lookups
            .into_iter()
            .filter(|l| chains.get(&l.chain_id).is_some_and(|c| c.contains(&l.venue_id)))
            .map(|l| l.venue_id)
            .collect())
    }

    /// Whether `chain_id` is a live chain that lists `venue_id`.
    fn owns(&self, chain_id: &str, venue_id: &str) -> ChainsResult<bool> {
        Ok(self.find(chain_id)?.is_some_and(|c| c.contains(venue_id)))
    }

    /// Upsert the chain and reconcile its members' lookup entries.
    ///
    /// Fails with `AlreadyInChain`, before writing anything, when a member's
    /// lookup names another live chain that still lists it. Lookups that are
    /// missing, stale, or carry an outdated confidence are rewritten.
    /// Returns the number of lookup entries written.
    pub fn save(&self, aggregate: &mut ChainAggregate) -> ChainsResult<usize> {
        if aggregate.is_empty() || aggregate.names.is_empty() {
            return Err(ChainsError::EmptyChain {
                chain_id: aggregate.id.clone(),
            });
        }

        let mut pending = Vec::new();
        for venue_id in &aggregate.members {
            let confidence = aggregate.confidence_of(venue_id).unwrap_or(0.0);
            match self.lookup(venue_id)? {
                Some(existing) if existing.chain_id == aggregate.id => {
                    if existing.confidence != confidence {
                        pending.push(VenueChainLookup::new(venue_id, &aggregate.id, confidence));
                    }
                }
                Some(existing) if self.owns(&existing.chain_id, venue_id)? => {
                    return Err(ChainsError::AlreadyInChain {
                        venue_id: venue_id.clone(),
                        chain_id: existing.chain_id,
                    });
                }
                _ => pending.push(VenueChainLookup::new(venue_id, &aggregate.id, confidence)),
            }
        }

        aggregate.touch();
        let document = encode(CHAINS_COLLECTION, aggregate.chain())?;
        self.store.put(CHAINS_COLLECTION, &document)?;

        for lookup in &pending {
            self.store.put(LOOKUP_COLLECTION, &encode(LOOKUP_COLLECTION, lookup)?)?;
        }
        debug!(chain_id = %aggregate.id, members = aggregate.len(), lookups = pending.len(), "chain saved");
        Ok(pending.len())
    }

    /// Create a chain over the given members.
    pub fn create(&self, members: &[(&Venue, f64)]) -> ChainsResult<Chain> {
        let mut aggregate = ChainAggregate::new();
        for (venue, confidence) in members {
            aggregate.add_member(venue, *confidence);
        }
        self.save(&mut aggregate)?;
        info!(chain_id = %aggregate.id, members = aggregate.len(), "chain created");
        Ok(aggregate.into_chain())
    }

    /// Add venues to an existing chain.
    pub fn add_to_chain(&self, chain_id: &str, venues: &[(&Venue, f64)]) -> ChainsResult<Chain> {
        let mut aggregate = self.load(chain_id)?;
        for (venue, confidence) in venues {
            aggregate.add_member(venue, *confidence);
        }
        self.save(&mut aggregate)?;
        info!(chain_id, added = venues.len(), members = aggregate.len(), "chain joined");
        Ok(aggregate.into_chain())
    }

    /// Remove a member. Returns `None` when the chain was emptied and deleted.
    pub fn remove_from_chain(&self, chain_id: &str, venue_id: &str) -> ChainsResult<Option<Chain>> {
        let mut aggregate = self.load(chain_id)?;
        if aggregate.remove_member(venue_id).is_none() {
            return Err(ChainsError::MissingVenue {
                venue_id: venue_id.to_string(),
            });
        }
        self.drop_lookup(venue_id, chain_id)?;
        info!(chain_id, venue_id, "member removed");

        if aggregate.is_empty() {
            self.store
                .remove(CHAINS_COLLECTION, &DocumentQuery::by_id(chain_id))?;
            info!(chain_id, "chain deleted after last member left");
            return Ok(None);
        }
        self.save(&mut aggregate)?;
        Ok(Some(aggregate.into_chain()))
    }

    /// Delete a chain: member lookups first, then the chain document.
    pub fn delete(&self, chain_id: &str) -> ChainsResult<Chain> {
        let chain = self.load(chain_id)?.into_chain();
        let dropped = self
            .store
            .remove(LOOKUP_COLLECTION, &DocumentQuery::all().eq("chain_id", chain_id))?;
        self.store
            .remove(CHAINS_COLLECTION, &DocumentQuery::by_id(chain_id))?;
        info!(chain_id, lookups = dropped, "chain deleted");
        Ok(chain)
    }

    /// Replace two chains with one over the union of their members.
    ///
    /// Both originals are deleted. Each member keeps its recorded confidence.
    pub fn merge(&self, first: &str, second: &str) -> ChainsResult<Chain> {
        if first == second {
            return Ok(self.load(first)?.into_chain());
        }
        // Load both before touching either, so a bad id changes nothing.
        let a = self.load(first)?.into_chain();
        let b = self.load(second)?.into_chain();

        let mut merged = ChainAggregate::new();
        for chain in [&a, &b] {
            for (venue_id, venue) in &chain.venues {
                let confidence = chain.confidence_of(venue_id).unwrap_or(0.0);
                merged.add_member(venue, confidence);
            }
        }

        self.delete(first)?;
        self.delete(second)?;
        self.save(&mut merged)?;
        info!(
            chain_id = %merged.id,
            from_a = first,
            from_b = second,
            members = merged.len(),
            "chains merged"
        );
        Ok(merged.into_chain())
    }

    /// Prune members whose standalone confidence is below `threshold`.
    pub fn prune(
        &self,
        chain_id: &str,
        scorer: &SimilarityScorer,
        threshold: f64,
    ) -> ChainsResult<PruneOutcome> {
        let mut aggregate = self.load(chain_id)?;
        let removed = aggregate.prune_below_confidence(scorer, threshold);
        for venue in &removed {
            self.drop_lookup(&venue.id, chain_id)?;
        }
        self.save(&mut aggregate)?;
        if !removed.is_empty() {
            info!(chain_id, removed = removed.len(), remaining = aggregate.len(), "chain pruned");
        }
        Ok(PruneOutcome {
            removed: removed.into_iter().map(|v| v.id).collect(),
            chain: aggregate.into_chain(),
        })
    }

    /// Re-save every chain and drop lookups no live chain backs.
    pub fn repair_lookups(&self) -> ChainsResult<RepairReport> {
        let mut report = RepairReport::default();

        for chain in self.all_chains()? {
            report.chains += 1;
            let mut aggregate = ChainAggregate::from(chain);
            match self.save(&mut aggregate) {
                Ok(written) => report.repaired += written,
                Err(ChainsError::AlreadyInChain { venue_id, chain_id }) => {
                    warn!(
                        chain_id = %aggregate.id,
                        venue_id = %venue_id,
                        owner = %chain_id,
                        "member owned by another chain, left unrepaired"
                    );
                    report.conflicts.push(venue_id);
                }
                Err(ChainsError::EmptyChain { chain_id }) => {
                    warn!(chain_id = %chain_id, "empty chain found during repair");
                }
                Err(e) => return Err(e),
            }
        }

        let docs = self.store.get_many(LOOKUP_COLLECTION, &DocumentQuery::all())?;
        for lookup in decode_all::<VenueChainLookup>(LOOKUP_COLLECTION, docs)? {
            if !self.owns(&lookup.chain_id, &lookup.venue_id)? {
                self.store
                    .remove(LOOKUP_COLLECTION, &DocumentQuery::by_id(&lookup.venue_id))?;
                report.orphans_removed += 1;
            }
        }

        info!(
            chains = report.chains,
            repaired = report.repaired,
            orphans = report.orphans_removed,
            conflicts = report.conflicts.len(),
            "lookups repaired"
        );
        Ok(report)
    }

    /// Remove a venue's lookup, but only if it still points at `chain_id`.
    fn drop_lookup(&self, venue_id: &str, chain_id: &str) -> ChainsResult<()> {
        let query = DocumentQuery::by_id(venue_id).eq("chain_id", chain_id);
        self.store.remove(LOOKUP_COLLECTION, &query)?;
        Ok(())
    }
}
