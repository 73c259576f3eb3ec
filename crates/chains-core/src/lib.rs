//! # chains-core
//!
//! Foundation crate for venue chain resolution.
//! Defines the venue/chain data model, the collaborator traits the resolver
//! consumes (document store, venue source, category tree), errors, config,
//! and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing_setup;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ChainsConfig;
pub use errors::{ChainsError, ChainsResult};
pub use models::{Chain, Resolution, ResolutionStage, SocialPlatform, Venue, VenueChainLookup};
