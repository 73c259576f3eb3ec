//! # chains-matching
//!
//! Entity resolution over venues: similarity scoring, the chain aggregate,
//! chain persistence with the venue→chain inverse index, and the staged
//! resolver: lookup → existing chains → exact match → fuzzy match →
//! form-or-join, with hint seeding as the last resort.

pub mod aggregate;
pub mod batch;
pub mod category_filter;
pub mod chain_store;
mod codec;
pub mod engine;
pub mod local;
pub mod pipeline;
pub mod pool;
pub mod scoring;
pub mod venue_cache;

pub use aggregate::ChainAggregate;
pub use batch::run_batch;
pub use category_filter::CategoryFilter;
pub use chain_store::{ChainStore, PruneOutcome, RepairReport};
pub use engine::Resolver;
pub use local::{compare_local, LocalAlternates, LocalComparison};
pub use scoring::{BestMatch, MatchScore, SimilarityScorer};
pub use venue_cache::VenueCache;
