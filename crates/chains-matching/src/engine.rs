//! Resolver: owns the stores, the fuzzy pool and the run statistics, and
//! drives each venue through the pipeline.

use std::sync::Arc;

use tracing::{debug, info, warn};

use chains_core::config::MatchingConfig;
use chains_core::errors::{ChainsResult, SourceError};
use chains_core::models::{Resolution, ResolutionStats, Venue};
use chains_core::traits::{IDocumentStore, IVenueSource};

use crate::category_filter::CategoryFilter;
use crate::chain_store::ChainStore;
use crate::pipeline::{self, StageContext};
use crate::pool::VenuePool;
use crate::scoring::SimilarityScorer;
use crate::venue_cache::VenueCache;

/// Decides, one venue at a time, which chain a venue belongs to.
///
/// Processing is sequential: every chain mutation for a venue completes
/// before the next venue starts. Only scoring fans out.
pub struct Resolver {
    chains: ChainStore,
    venues: VenueCache,
    filter: CategoryFilter,
    scorer: SimilarityScorer,
    config: MatchingConfig,
    pool: VenuePool,
    /// Remote source for the global pre-pass and fetch-by-id.
    source: Option<Arc<dyn IVenueSource>>,
    stats: ResolutionStats,
}

impl Resolver {
    pub fn new(store: Arc<dyn IDocumentStore>, filter: CategoryFilter, config: MatchingConfig) -> Self {
        Self {
            chains: ChainStore::new(store.clone()),
            venues: VenueCache::new(store),
            filter,
            scorer: SimilarityScorer::from_config(&config),
            config,
            pool: VenuePool::new(),
            source: None,
            stats: ResolutionStats::default(),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn IVenueSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn chain_store(&self) -> &ChainStore {
        &self.chains
    }

    pub fn venue_cache(&self) -> &VenueCache {
        &self.venues
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn pool(&self) -> &VenuePool {
        &self.pool
    }

    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }

    /// Hand back the statistics gathered so far and start a fresh tally.
    pub fn take_stats(&mut self) -> ResolutionStats {
        std::mem::take(&mut self.stats)
    }

    /// Pool every cached, non-excluded venue. Returns the whole cached
    /// corpus in cache order.
    pub fn load_pool(&mut self) -> ChainsResult<Vec<Venue>> {
        let corpus = self.venues.all()?;
        let mut excluded = 0usize;
        for venue in &corpus {
            if self.filter.is_excluded(venue) {
                excluded += 1;
            } else {
                self.pool.insert(venue.clone());
            }
        }
        info!(pooled = self.pool.len(), excluded, "venue pool loaded");
        Ok(corpus)
    }

    /// Resolve one venue, running the global pre-pass first when enabled.
    pub fn resolve(&mut self, venue: &Venue) -> ChainsResult<Resolution> {
        if self.config.global_search {
            self.global_prepass(venue)?;
        }
        self.resolve_one(venue)
    }

    /// Fetch a venue from the source, then resolve it.
    pub fn fetch_and_resolve(&mut self, venue_id: &str) -> ChainsResult<Resolution> {
        let source = self.source.clone().ok_or_else(|| SourceError::Unsupported {
            operation: "fetch_venue without a configured venue source".to_string(),
        })?;
        let venue = source.fetch_venue(venue_id)?;
        self.resolve(&venue)
    }

    fn resolve_one(&mut self, venue: &Venue) -> ChainsResult<Resolution> {
        if self.filter.is_excluded(venue) {
            debug!(venue_id = %venue.id, "home or residence, excluded");
            self.stats.record(&Resolution::Excluded);
            return Ok(Resolution::Excluded);
        }

        let result = self.attempt(venue);
        self.pool.mark_compared(&venue.id);

        match result {
            Ok(resolution) => {
                self.stats.record(&resolution);
                Ok(resolution)
            }
            Err(e) => {
                if e.is_recoverable() {
                    warn!(venue_id = %venue.id, error = %e, "venue skipped");
                    self.stats.record_skipped(&venue.id);
                }
                Err(e)
            }
        }
    }

    fn attempt(&mut self, venue: &Venue) -> ChainsResult<Resolution> {
        self.venues.put(venue)?;
        self.pool.insert(venue.clone());

        let ctx = StageContext {
            chains: &self.chains,
            venues: &self.venues,
            scorer: &self.scorer,
            filter: &self.filter,
            config: &self.config,
        };
        pipeline::run_pipeline(&ctx, &self.pool, venue, &mut self.stats)
    }

    /// Search the source for the venue's name, cache and pool what comes
    /// back, and resolve each result before the venue itself.
    fn global_prepass(&mut self, venue: &Venue) -> ChainsResult<()> {
        let Some(source) = self.source.clone() else {
            return Ok(());
        };
        let found = match source.search_global(&venue.name) {
            Ok(found) => found,
            Err(e) if e.is_recoverable() => {
                warn!(venue_id = %venue.id, error = %e, "global search failed, continuing without it");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let related: Vec<Venue> = found
            .into_iter()
            .filter(|other| other.id != venue.id && !self.filter.is_excluded(other))
            .collect();
        debug!(venue_id = %venue.id, related = related.len(), "global pre-pass");

        for other in &related {
            self.venues.put(other)?;
            self.pool.insert(other.clone());
        }
        for other in &related {
            match self.resolve_one(other) {
                Ok(_) => {}
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
