use chains_core::models::SocialPlatform;
use test_fixtures::*;

#[test]
fn fixtures_root_exists() {
    assert!(fixtures_root().exists(), "fixture data directory not found");
}

#[test]
fn high_street_corpus_converts() {
    let venues = high_street_venues();
    assert_eq!(venues.len(), 12);
    assert_eq!(venues[0].id, ids::STARBUCKS_QUEEN_ST);
    assert!(venues[0].chain_hint);
    assert_eq!(venues[1].url.as_deref(), Some("starbucks.co.uk"));
    assert_eq!(venues[3].handle(SocialPlatform::Facebook), None);
    assert!(venues.iter().all(|v| v.location.is_some()));
}

#[test]
fn category_tree_has_home_root() {
    let tree = category_tree_json();
    let roots = tree["response"]["categories"].as_array().unwrap();
    assert_eq!(roots[0]["id"], chains_core::constants::HOME_RESIDENCE_ROOT_ID);
}

#[test]
fn branded_venues_share_identity() {
    let venues = branded_venues("pret", "Pret A Manger", 3);
    assert_eq!(venues.len(), 3);
    assert_eq!(venues[2].id, "pret-2");
    assert_eq!(venues[0].url.as_deref(), Some("pretamanger.example"));
    assert_eq!(venues[0].url, venues[1].url);
}
