//! Venue snapshot and the boundary conversion from location-API JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{CHAIN_PAGE_TYPE, SOCIAL_NONE_SENTINEL};
use crate::errors::SourceError;

/// Social platforms a venue may publish a handle for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Twitter,
    Facebook,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 2] = [SocialPlatform::Twitter, SocialPlatform::Facebook];

    pub fn as_str(self) -> &'static str {
        match self {
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Facebook => "facebook",
        }
    }

    /// Dotted path of this platform's handle inside a stored venue document.
    pub fn field_path(self) -> &'static str {
        match self {
            SocialPlatform::Twitter => "social.twitter",
            SocialPlatform::Facebook => "social.facebook",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known handles of one venue. `None` means unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialHandles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

impl SocialHandles {
    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        match platform {
            SocialPlatform::Twitter => self.twitter.as_deref(),
            SocialPlatform::Facebook => self.facebook.as_deref(),
        }
    }

    /// Set a handle, normalizing empty values and the "none" sentinel to unknown.
    pub fn set(&mut self, platform: SocialPlatform, handle: &str) {
        let handle = normalize_handle(handle);
        match platform {
            SocialPlatform::Twitter => self.twitter = handle,
            SocialPlatform::Facebook => self.facebook = handle,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.twitter.is_none() && self.facebook.is_none()
    }
}

/// WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Immutable venue snapshot. Built once at the boundary; never mutated by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Normalized registrable domain, lower-case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub social: SocialHandles,
    /// Category ids, primary first.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// The data source marks this venue as belonging to a chain.
    #[serde(default)]
    pub chain_hint: bool,
}

impl Venue {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
            social: SocialHandles::default(),
            categories: Vec::new(),
            location: None,
            chain_hint: false,
        }
    }

    /// Attach a URL; it is normalized to its domain.
    pub fn with_url(mut self, raw: &str) -> Self {
        self.url = normalize_domain(raw);
        self
    }

    pub fn with_handle(mut self, platform: SocialPlatform, handle: &str) -> Self {
        self.social.set(platform, handle);
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(GeoPoint { lat, lng });
        self
    }

    pub fn with_chain_hint(mut self, hint: bool) -> Self {
        self.chain_hint = hint;
        self
    }

    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }

    pub fn handle(&self, platform: SocialPlatform) -> Option<&str> {
        self.social.get(platform)
    }

    /// Convert a location-API venue payload into a `Venue`.
    ///
    /// Accepts both the full response (`{"response": {"venue": {...}}}`) and
    /// the bare venue object.
    pub fn from_api_json(payload: &Value) -> Result<Self, SourceError> {
        let raw = payload.pointer("/response/venue").unwrap_or(payload);

        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| SourceError::Malformed {
                reason: "venue has no string 'id'".to_string(),
            })?;
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SourceError::Malformed {
                reason: format!("venue '{id}' has no string 'name'"),
            })?;

        let mut venue = Venue::new(id, name);
        if let Some(url) = raw.get("url").and_then(Value::as_str) {
            venue.url = normalize_domain(url);
        }
        if let Some(contact) = raw.get("contact") {
            for platform in SocialPlatform::ALL {
                if let Some(handle) = contact.get(platform.as_str()).and_then(Value::as_str) {
                    venue.social.set(platform, handle);
                }
            }
        }
        if let Some(categories) = raw.get("categories").and_then(Value::as_array) {
            venue.categories = categories
                .iter()
                .filter_map(|c| match c {
                    Value::String(id) => Some(id.clone()),
                    other => other.get("id").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
        }
        if let Some(location) = raw.get("location") {
            let lat = location.get("lat").and_then(Value::as_f64);
            let lng = location.get("lng").and_then(Value::as_f64);
            if let (Some(lat), Some(lng)) = (lat, lng) {
                venue.location = Some(GeoPoint { lat, lng });
            }
        }
        venue.chain_hint = raw
            .pointer("/page/user/type")
            .and_then(Value::as_str)
            .is_some_and(|t| t == CHAIN_PAGE_TYPE);

        Ok(venue)
    }
}

/// Reduce a URL (with or without scheme) to its lower-case registrable
/// domain: `http://m.Tesco.com/store` becomes `tesco.com`.
///
/// Hosts without a registrable domain (IP addresses, bare TLDs) keep the
/// host minus a leading `www.`. Returns `None` for empty input, the "none"
/// sentinel, or anything without a host.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(SOCIAL_NONE_SENTINEL) {
        return None;
    }
    let parsed = url::Url::parse(raw)
        .ok()
        .filter(url::Url::has_host)
        .or_else(|| url::Url::parse(&format!("http://{raw}")).ok())?;
    let host = match parsed.host()? {
        url::Host::Domain(name) => name.trim_end_matches('.').to_ascii_lowercase(),
        url::Host::Ipv4(ip) => return Some(ip.to_string()),
        url::Host::Ipv6(ip) => return Some(ip.to_string()),
    };
    let domain = match psl::domain_str(&host) {
        Some(registrable) => registrable,
        None => host.strip_prefix("www.").unwrap_or(&host),
    };
    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// Trimmed handle, or `None` when empty or the "none" sentinel.
pub fn normalize_handle(raw: &str) -> Option<String> {
    let handle = raw.trim();
    if handle.is_empty() || handle.eq_ignore_ascii_case(SOCIAL_NONE_SENTINEL) {
        None
    } else {
        Some(handle.to_string())
    }
}
