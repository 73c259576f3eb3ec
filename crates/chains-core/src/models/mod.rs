mod category;
mod chain;
mod lookup;
mod resolution;
mod stats;
mod venue;

pub use category::Category;
pub use chain::{Chain, ChainSocial};
pub use lookup::VenueChainLookup;
pub use resolution::{Resolution, ResolutionStage};
pub use stats::ResolutionStats;
pub use venue::{normalize_domain, normalize_handle, GeoPoint, SocialHandles, SocialPlatform, Venue};
