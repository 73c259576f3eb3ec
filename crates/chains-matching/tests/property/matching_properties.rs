//! Property tests for chain membership and scoring invariants.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;

use chains_core::config::MatchingConfig;
use chains_core::models::{SocialPlatform, Venue};
use chains_core::traits::IDocumentStore;
use chains_matching::{run_batch, CategoryFilter, ChainAggregate, ChainStore, Resolver, SimilarityScorer};
use chains_storage::MemoryDocumentStore;

const NAMES: [&str; 6] = ["Costa", "Costa Coffee", "Starbucks", "Greggs", "Greggs Bakery", "Subway"];
const DOMAINS: [&str; 3] = ["costa.co.uk", "starbucks.com", "greggs.co.uk"];
const HANDLES: [&str; 3] = ["CostaCoffee", "Starbucks", "GreggsOfficial"];
const CATEGORIES: [&str; 3] = ["coffee", "bakery", "sandwich"];

fn venue_strategy() -> impl Strategy<Value = (usize, Option<usize>, Option<usize>, Vec<usize>)> {
    (
        0..NAMES.len(),
        prop::option::of(0..DOMAINS.len()),
        prop::option::of(0..HANDLES.len()),
        prop::collection::vec(0..CATEGORIES.len(), 0..3),
    )
}

fn build(id: usize, (name, domain, handle, categories): &(usize, Option<usize>, Option<usize>, Vec<usize>)) -> Venue {
    let mut venue = Venue::new(format!("v{id}"), NAMES[*name])
        .with_categories(categories.iter().map(|&c| CATEGORIES[c]));
    if let Some(d) = domain {
        venue = venue.with_url(DOMAINS[*d]);
    }
    if let Some(h) = handle {
        venue = venue.with_handle(SocialPlatform::Twitter, HANDLES[*h]);
    }
    venue
}

fn corpus_strategy(max: usize) -> impl Strategy<Value = Vec<Venue>> {
    prop::collection::vec(venue_strategy(), 1..max).prop_map(|shapes| {
        shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| build(i, shape))
            .collect()
    })
}

#[derive(Debug, Clone)]
enum Op {
    Create(usize, usize),
    Add(usize, usize),
    Remove(usize, usize),
    Merge(usize, usize),
    Delete(usize),
}

fn op_strategy(venues: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..venues, 0..venues).prop_map(|(a, b)| Op::Create(a, b)),
        (0..8usize, 0..venues).prop_map(|(c, v)| Op::Add(c, v)),
        (0..8usize, 0..venues).prop_map(|(c, v)| Op::Remove(c, v)),
        (0..8usize, 0..8usize).prop_map(|(a, b)| Op::Merge(a, b)),
        (0..8usize).prop_map(Op::Delete),
    ]
}

/// Every venue is listed by at most one chain, and its lookup names exactly that chain.
fn assert_single_membership(chains: &ChainStore, venues: &[Venue]) {
    let all = chains.all_chains().unwrap();
    for venue in venues {
        let owners: Vec<&str> = all
            .iter()
            .filter(|c| c.contains(&venue.id))
            .map(|c| c.id.as_str())
            .collect();
        assert!(owners.len() <= 1, "{} is in {:?}", venue.id, owners);
        assert_eq!(
            chains.lookup_chain_for(&venue.id).unwrap().as_deref(),
            owners.first().copied(),
            "lookup of {} disagrees with chain documents",
            venue.id
        );
    }
}

proptest! {
    #[test]
    fn self_score_name_is_one(name in ".{0,40}") {
        let venue = Venue::new("v", name);
        let score = SimilarityScorer::default().score_venue_pair(&venue, &venue);
        prop_assert_eq!(score.name, 1.0);
    }

    #[test]
    fn pair_scores_are_symmetric(a in venue_strategy(), b in venue_strategy()) {
        let (x, y) = (build(0, &a), build(1, &b));
        let scorer = SimilarityScorer::default();
        prop_assert_eq!(scorer.score_venue_pair(&x, &y), scorer.score_venue_pair(&y, &x));
    }

    #[test]
    fn remove_then_readd_restores_attributes(venues in corpus_strategy(8), pick in any::<prop::sample::Index>()) {
        let mut aggregate = ChainAggregate::new();
        for venue in &venues {
            aggregate.add_member(venue, 1.0);
        }
        let before = aggregate.chain().clone();
        let target = &venues[pick.index(venues.len())];

        aggregate.remove_member(&target.id);
        aggregate.add_member(target, 1.0);

        let after = aggregate.chain();
        prop_assert_eq!(&after.members, &before.members);
        prop_assert_eq!(&after.names, &before.names);
        prop_assert_eq!(&after.urls, &before.urls);
        prop_assert_eq!(&after.social, &before.social);
        prop_assert_eq!(&after.categories, &before.categories);
        prop_assert_eq!(&after.confidences, &before.confidences);
    }

    #[test]
    fn prune_leaves_no_member_below_threshold(venues in corpus_strategy(10), threshold in 0.0f64..2.5) {
        let scorer = SimilarityScorer::default();
        let mut aggregate = ChainAggregate::new();
        for venue in &venues {
            aggregate.add_member(venue, 1.0);
        }
        let removed = aggregate.prune_below_confidence(&scorer, threshold);

        prop_assert!(!aggregate.is_empty());
        prop_assert_eq!(removed.len() + aggregate.len(), venues.len());
        prop_assert!(aggregate.is_consistent());
        if aggregate.len() >= 2 {
            for id in aggregate.members.iter() {
                let standalone = aggregate.standalone_confidence(&scorer, id).unwrap();
                prop_assert!(standalone >= threshold, "{} scored {} < {}", id, standalone, threshold);
            }
        }
    }

    #[test]
    fn store_operations_never_double_assign(
        venues in corpus_strategy(8),
        ops in prop::collection::vec(op_strategy(8), 1..25),
    ) {
        let store: Arc<dyn IDocumentStore> = Arc::new(MemoryDocumentStore::new());
        let chains = ChainStore::new(store);
        let n = venues.len();

        for op in ops {
            let ids: Vec<String> = chains.all_chains().unwrap().into_iter().map(|c| c.id).collect();
            let chain_at = |i: usize| ids.get(i % ids.len().max(1)).cloned();
            // Rejections are expected; only the invariant matters.
            let _ = match op {
                Op::Create(a, b) => chains
                    .create(&[(&venues[a % n], 1.0), (&venues[b % n], 1.0)])
                    .map(|_| ()),
                Op::Add(c, v) => match chain_at(c) {
                    Some(id) => chains.add_to_chain(&id, &[(&venues[v % n], 1.0)]).map(|_| ()),
                    None => Ok(()),
                },
                Op::Remove(c, v) => match chain_at(c) {
                    Some(id) => chains.remove_from_chain(&id, &venues[v % n].id).map(|_| ()),
                    None => Ok(()),
                },
                Op::Merge(a, b) => match (chain_at(a), chain_at(b)) {
                    (Some(x), Some(y)) => chains.merge(&x, &y).map(|_| ()),
                    _ => Ok(()),
                },
                Op::Delete(c) => match chain_at(c) {
                    Some(id) => chains.delete(&id).map(|_| ()),
                    None => Ok(()),
                },
            };
            assert_single_membership(&chains, &venues);
        }
    }

    #[test]
    fn batch_never_double_assigns(venues in corpus_strategy(14)) {
        let store: Arc<dyn IDocumentStore> = Arc::new(MemoryDocumentStore::new());
        let mut resolver = Resolver::new(store, CategoryFilter::without_tree(), MatchingConfig::default());
        for venue in &venues {
            resolver.venue_cache().put(venue).unwrap();
        }
        let stats = run_batch(&mut resolver).unwrap();

        prop_assert_eq!(stats.processed, venues.len());
        assert_single_membership(resolver.chain_store(), &venues);

        let mut sizes: HashMap<String, usize> = HashMap::new();
        for venue in &venues {
            if let Some(chain_id) = resolver.chain_store().lookup_chain_for(&venue.id).unwrap() {
                *sizes.entry(chain_id).or_default() += 1;
            }
        }
        let members: usize = resolver.chain_store().all_chains().unwrap().iter().map(|c| c.len()).sum();
        prop_assert_eq!(sizes.values().sum::<usize>(), members);
    }
}
