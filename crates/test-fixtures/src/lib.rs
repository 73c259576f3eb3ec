//! Shared fixtures for chain resolution tests: location-API JSON samples,
//! the category hierarchy, and small venue builders.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

use chains_core::models::{SocialPlatform, Venue};

/// Ids of the venues in `venues/high_street.json`, in file order.
pub mod ids {
    pub const STARBUCKS_QUEEN_ST: &str = "4b0588a2f964a52044d422e3";
    pub const STARBUCKS_BAY: &str = "4c1f7c6f8b3aa593c5e8d3e0";
    pub const COSTA_COFFEE: &str = "4b5d3c1ff964a520505829e3";
    pub const COSTA: &str = "4bb9f1d53db7b7137b6e1e01";
    pub const TESCO: &str = "4ac518cdf964a520e6a520e3";
    pub const TESCO_METRO: &str = "4b8e5a7bf964a520d52433e3";
    pub const TESCO_EXPRESS: &str = "4d00decff7b38cfab4bcd1c3";
    pub const GREGGS: &str = "4f3a9b2ee4b0c1d2e3f4a5b6";
    pub const LITTLE_TEAPOT: &str = "4e2b1a0fd4c3b2a1f0e9d8c7";
    pub const STARBUCKS_RESIDENCES: &str = "50c2f5e1e4b0a1b2c3d4e5f6";
    pub const WESTFIELD_MALL: &str = "4a9c8b7d6e5f4a3b2c1d0e9f";
    pub const WESTFIELD_SANDWICH: &str = "4f0e1d2c3b4a59687766a5b4";
}

/// Category ids used by the fixtures.
pub mod categories {
    pub const COFFEE_SHOP: &str = "4bf58dd8d48988d1e0931735";
    pub const CAFE: &str = "4bf58dd8d48988d16d941735";
    pub const SUPERMARKET: &str = "52f2ab2ebcbc57f1066b8b46";
    pub const SHOPPING_MALL: &str = "4bf58dd8d48988d1fd941735";
    pub const RESIDENTIAL_BUILDING: &str = "5032891291d4c4b30a586d68";
    pub const ASSISTED_LIVING: &str = "52f2ab2ebcbc57f1066b8b55";
}

/// Root of the fixture data directory.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

pub fn load_fixture_value(relative_path: &str) -> Value {
    load_fixture(relative_path)
}

/// The location API's category hierarchy response.
pub fn category_tree_json() -> Value {
    load_fixture_value("categories.json")
}

/// Raw API payloads of the high street corpus, some response-wrapped, some bare.
pub fn high_street_payloads() -> Vec<Value> {
    load_fixture("venues/high_street.json")
}

/// The high street corpus converted to venues, in file order.
pub fn high_street_venues() -> Vec<Venue> {
    high_street_payloads()
        .iter()
        .map(|p| Venue::from_api_json(p).unwrap_or_else(|e| panic!("Bad venue fixture: {e}")))
        .collect()
}

/// Look up one corpus venue by id.
pub fn high_street_venue(id: &str) -> Venue {
    high_street_venues()
        .into_iter()
        .find(|v| v.id == id)
        .unwrap_or_else(|| panic!("No venue fixture with id {id}"))
}

/// A venue carrying a brand's full identity: name, domain and twitter handle.
pub fn branded_venue(id: &str, brand: &str) -> Venue {
    let slug: String = brand
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    Venue::new(id, brand)
        .with_url(&format!("https://www.{slug}.example"))
        .with_handle(SocialPlatform::Twitter, &slug)
}

/// `count` branded venues with ids `{prefix}-0`, `{prefix}-1`, ...
pub fn branded_venues(prefix: &str, brand: &str, count: usize) -> Vec<Venue> {
    (0..count)
        .map(|i| branded_venue(&format!("{prefix}-{i}"), brand))
        .collect()
}
