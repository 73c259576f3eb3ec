//! Chain document as persisted in the `chains` collection.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::venue::{SocialPlatform, Venue};

/// Distinct handles contributed by chain members, per platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSocial {
    #[serde(default)]
    pub twitter: BTreeSet<String>,
    #[serde(default)]
    pub facebook: BTreeSet<String>,
}

impl ChainSocial {
    pub fn get(&self, platform: SocialPlatform) -> &BTreeSet<String> {
        match platform {
            SocialPlatform::Twitter => &self.twitter,
            SocialPlatform::Facebook => &self.facebook,
        }
    }

    pub fn get_mut(&mut self, platform: SocialPlatform) -> &mut BTreeSet<String> {
        match platform {
            SocialPlatform::Twitter => &mut self.twitter,
            SocialPlatform::Facebook => &mut self.facebook,
        }
    }
}

/// A group of commonly branded venues.
///
/// Attribute sets (`names`, `urls`, `social`, `categories`) are always the
/// union of the current members' attributes. `venues` keeps the member
/// snapshots those unions are recomputed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    #[serde(rename = "_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub members: BTreeSet<String>,
    pub names: BTreeSet<String>,
    #[serde(default)]
    pub urls: BTreeSet<String>,
    #[serde(default)]
    pub social: ChainSocial,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Confidence recorded for each member when it was added.
    pub confidences: BTreeMap<String, f64>,
    pub venues: BTreeMap<String, Venue>,
}

impl Chain {
    /// An empty chain with a fresh id.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            created_at: now,
            updated_at: now,
            members: BTreeSet::new(),
            names: BTreeSet::new(),
            urls: BTreeSet::new(),
            social: ChainSocial::default(),
            categories: BTreeSet::new(),
            confidences: BTreeMap::new(),
            venues: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, venue_id: &str) -> bool {
        self.members.contains(venue_id)
    }

    pub fn confidence_of(&self, venue_id: &str) -> Option<f64> {
        self.confidences.get(venue_id).copied()
    }

    pub fn handles(&self, platform: SocialPlatform) -> &BTreeSet<String> {
        self.social.get(platform)
    }

    /// Member, confidence and snapshot maps agree on the same id set.
    pub fn is_consistent(&self) -> bool {
        self.members.len() == self.confidences.len()
            && self.members.len() == self.venues.len()
            && self
                .members
                .iter()
                .all(|id| self.confidences.contains_key(id) && self.venues.contains_key(id))
    }
}
