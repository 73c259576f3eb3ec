use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inverse index entry: which chain a venue belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueChainLookup {
    #[serde(rename = "_id")]
    pub venue_id: String,
    pub chain_id: String,
    pub confidence: f64,
    pub updated_at: DateTime<Utc>,
}

impl VenueChainLookup {
    pub fn new(venue_id: impl Into<String>, chain_id: impl Into<String>, confidence: f64) -> Self {
        Self {
            venue_id: venue_id.into(),
            chain_id: chain_id.into(),
            confidence,
            updated_at: Utc::now(),
        }
    }
}
