//! Property tests for the venue boundary conversion.

use proptest::prelude::*;
use serde_json::json;

use chains_core::models::{normalize_domain, SocialPlatform, Venue};

fn host() -> impl Strategy<Value = String> {
    ("[a-z]{1,10}", prop::sample::select(vec!["com", "co.uk", "org"]))
        .prop_map(|(name, tld)| format!("{name}.{tld}"))
}

fn spelled_url() -> impl Strategy<Value = (String, String)> {
    (
        host(),
        prop::sample::select(vec!["", "http://", "https://", "www.", "https://www."]),
        prop::sample::select(vec!["", "/", "/store/42", "?ref=map"]),
    )
        .prop_map(|(host, scheme, path)| (host.clone(), format!("{scheme}{host}{path}")))
}

proptest! {
    #[test]
    fn every_spelling_normalizes_to_the_host((host, raw) in spelled_url()) {
        let domain = normalize_domain(&raw);
        prop_assert_eq!(domain.as_deref(), Some(host.as_str()));
        prop_assert_eq!(normalize_domain(&host), domain);
    }

    #[test]
    fn wrapped_and_bare_payloads_agree(
        id in "[a-f0-9]{24}",
        name in "[A-Za-z][A-Za-z ]{0,19}",
        (_, url) in spelled_url(),
        twitter in prop::option::of("[a-z]{1,12}".prop_filter("sentinel", |h| h != "none")),
    ) {
        let bare = json!({
            "id": id,
            "name": name,
            "url": url,
            "contact": {"twitter": twitter.clone().unwrap_or_else(|| "none".to_string())},
            "categories": [{"id": "cat-1"}, {"id": "cat-2"}],
        });
        let wrapped = json!({"response": {"venue": bare.clone()}});

        let a = Venue::from_api_json(&bare).unwrap();
        let b = Venue::from_api_json(&wrapped).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.handle(SocialPlatform::Twitter), twitter.as_deref());
        prop_assert_eq!(a.primary_category(), Some("cat-1"));
    }
}
