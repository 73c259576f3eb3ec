//! Similarity scoring between venues, and between a venue and a chain.
//!
//! Every score is a pure function of immutable snapshots, so candidate
//! scoring fans out over rayon. The best-match reduction is always
//! sequential: ties keep the first-seen maximum in caller order.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use chains_core::config::MatchingConfig;
use chains_core::models::{Chain, SocialPlatform, Venue};

/// Below this many candidates the scoring stays on the calling thread.
const PARALLEL_MIN_CANDIDATES: usize = 64;

/// Per-dimension similarity of a venue to a venue or chain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchScore {
    /// Levenshtein ratio, or the mean ratio over a chain's names. In [0, 1].
    pub name: f64,
    /// 1.0 when the normalized domains agree.
    pub url: f64,
    /// 1.0 per platform with an agreeing handle.
    pub social: f64,
    /// Signed category signal in {-1, 0, 1}; only set past the name gate.
    pub category: f64,
}

impl MatchScore {
    /// Summed confidence, optionally including the category signal.
    pub fn confidence(&self, include_category: bool) -> f64 {
        let base = self.name + self.url + self.social;
        if include_category {
            base + self.category
        } else {
            base
        }
    }
}

/// Result of a best-candidate reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch<'a, T> {
    pub candidate: Option<&'a T>,
    pub confidence: f64,
}

impl<T> BestMatch<'_, T> {
    fn none() -> Self {
        Self {
            candidate: None,
            confidence: 0.0,
        }
    }

    /// The candidate, if one was found at or above `threshold`.
    pub fn at_least(&self, threshold: f64) -> Option<&T> {
        self.candidate.filter(|_| self.confidence >= threshold)
    }
}

/// Levenshtein ratio of two names: `1 - indel_distance / (len_a + len_b)`,
/// over chars.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    rapidfuzz::fuzz::ratio(a.chars(), b.chars())
}

/// +1 when the sides share a category, -1 when both are known and disjoint,
/// 0 when either side is unknown.
fn category_signal<'a>(
    left: impl IntoIterator<Item = &'a String>,
    right: &BTreeSet<&'a str>,
) -> f64 {
    let mut any_left = false;
    for category in left {
        any_left = true;
        if right.contains(category.as_str()) {
            return 1.0;
        }
    }
    if any_left && !right.is_empty() {
        -1.0
    } else {
        0.0
    }
}

/// Scores venues against venues and chains.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityScorer {
    category_gate: f64,
    include_category: bool,
    parallel: bool,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

impl SimilarityScorer {
    pub fn new(category_gate: f64, include_category: bool) -> Self {
        Self {
            category_gate,
            include_category,
            parallel: true,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self {
            category_gate: config.category_gate,
            include_category: config.include_category_in_confidence,
            parallel: config.parallel_scoring,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn includes_category(&self) -> bool {
        self.include_category
    }

    /// Confidence of a score under this scorer's category policy.
    pub fn confidence(&self, score: &MatchScore) -> f64 {
        score.confidence(self.include_category)
    }

    pub fn score_venue_pair(&self, a: &Venue, b: &Venue) -> MatchScore {
        let name = name_similarity(&a.name, &b.name);

        let url = match (&a.url, &b.url) {
            (Some(x), Some(y)) if x == y => 1.0,
            _ => 0.0,
        };

        let social = SocialPlatform::ALL
            .iter()
            .filter(|&&p| matches!((a.handle(p), b.handle(p)), (Some(x), Some(y)) if x == y))
            .count() as f64;

        let category = if name > self.category_gate {
            let right: BTreeSet<&str> = b.categories.iter().map(String::as_str).collect();
            category_signal(&a.categories, &right)
        } else {
            0.0
        };

        MatchScore {
            name,
            url,
            social,
            category,
        }
    }

    /// Score a venue against a chain's attribute sets.
    ///
    /// Returns `None` when the chain has no names, which a stored chain never does.
    pub fn score_venue_against_chain(&self, venue: &Venue, chain: &Chain) -> Option<MatchScore> {
        if chain.names.is_empty() {
            return None;
        }
        let total: f64 = chain
            .names
            .iter()
            .map(|n| name_similarity(&venue.name, n))
            .sum();
        let name = total / chain.names.len() as f64;

        let url = match &venue.url {
            Some(domain) if chain.urls.contains(domain) => 1.0,
            _ => 0.0,
        };

        let social = SocialPlatform::ALL
            .iter()
            .filter(|&&p| venue.handle(p).is_some_and(|h| chain.handles(p).contains(h)))
            .count() as f64;

        let category = if name > self.category_gate {
            let right: BTreeSet<&str> = chain.categories.iter().map(String::as_str).collect();
            category_signal(&venue.categories, &right)
        } else {
            0.0
        };

        Some(MatchScore {
            name,
            url,
            social,
            category,
        })
    }

    /// Confidence of `venue` against each chain, in candidate order.
    /// Chains without names score 0.
    pub fn chain_confidences(&self, venue: &Venue, candidates: &[Chain]) -> Vec<f64> {
        let score = |chain: &Chain| {
            self.score_venue_against_chain(venue, chain)
                .map_or(0.0, |s| self.confidence(&s))
        };
        if self.parallel && candidates.len() >= PARALLEL_MIN_CANDIDATES {
            candidates.par_iter().map(score).collect()
        } else {
            candidates.iter().map(score).collect()
        }
    }

    /// Pairwise confidence of `venue` against each candidate, in order.
    pub fn venue_confidences(&self, venue: &Venue, candidates: &[Venue]) -> Vec<f64> {
        let score = |other: &Venue| self.confidence(&self.score_venue_pair(venue, other));
        if self.parallel && candidates.len() >= PARALLEL_MIN_CANDIDATES {
            candidates.par_iter().map(score).collect()
        } else {
            candidates.iter().map(score).collect()
        }
    }

    pub fn find_best_chain_match<'c>(&self, venue: &Venue, candidates: &'c [Chain]) -> BestMatch<'c, Chain> {
        best_of(candidates, &self.chain_confidences(venue, candidates))
    }

    pub fn find_best_venue_match<'c>(&self, venue: &Venue, candidates: &'c [Venue]) -> BestMatch<'c, Venue> {
        best_of(candidates, &self.venue_confidences(venue, candidates))
    }
}

/// First strict maximum above zero.
pub(crate) fn best_of<'c, T>(candidates: &'c [T], confidences: &[f64]) -> BestMatch<'c, T> {
    let mut best = BestMatch::none();
    for (candidate, &confidence) in candidates.iter().zip(confidences) {
        if confidence > best.confidence {
            best = BestMatch {
                candidate: Some(candidate),
                confidence,
            };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(names: &[&str], urls: &[&str], categories: &[&str]) -> Chain {
        let mut chain = Chain::empty();
        chain.names = names.iter().map(|s| s.to_string()).collect();
        chain.urls = urls.iter().map(|s| s.to_string()).collect();
        chain.categories = categories.iter().map(|s| s.to_string()).collect();
        chain
    }

    #[test]
    fn identical_names_score_one() {
        let scorer = SimilarityScorer::default();
        let v = Venue::new("a", "Starbucks");
        assert_eq!(scorer.score_venue_pair(&v, &v).name, 1.0);
    }

    #[test]
    fn name_ratio_counts_insertions_and_deletions() {
        assert!((name_similarity("Starbuck", "Starbucks") - 16.0 / 17.0).abs() < 1e-12);
        // A substitution is one deletion plus one insertion.
        assert!((name_similarity("Costa", "Cista") - 0.8).abs() < 1e-12);
        assert!((name_similarity("Tesco", "Tesco Metro") - 10.0 / 16.0).abs() < 1e-12);
        assert_eq!(name_similarity("Greggs", "Greggs"), 1.0);
    }

    #[test]
    fn one_letter_short_still_pairs() {
        let scorer = SimilarityScorer::default();
        let a = Venue::new("a", "Starbuck");
        let b = Venue::new("b", "Starbucks");
        let score = scorer.score_venue_pair(&a, &b);
        assert!(score.name > 0.9);
        assert!(scorer.confidence(&score) >= 0.9);
    }

    #[test]
    fn same_domain_and_name_clear_threshold() {
        let scorer = SimilarityScorer::default();
        let a = Venue::new("a", "Starbucks").with_url("http://www.starbucks.com");
        let b = Venue::new("b", "Starbucks").with_url("starbucks.com/uk");
        let score = scorer.score_venue_pair(&a, &b);
        assert_eq!(score.url, 1.0);
        assert!(scorer.confidence(&score) >= 1.9);
    }

    #[test]
    fn subdomains_share_a_url_score() {
        let scorer = SimilarityScorer::default();
        let a = Venue::new("a", "Starbucks").with_url("https://uk.starbucks.com");
        let b = Venue::new("b", "Starbucks Reserve").with_url("starbucks.com");
        assert_eq!(scorer.score_venue_pair(&a, &b).url, 1.0);
    }

    #[test]
    fn social_counts_each_agreeing_platform() {
        let scorer = SimilarityScorer::default();
        let a = Venue::new("a", "Costa")
            .with_handle(SocialPlatform::Twitter, "costacoffee")
            .with_handle(SocialPlatform::Facebook, "costa");
        let b = a.clone();
        assert_eq!(scorer.score_venue_pair(&a, &b).social, 2.0);

        let c = Venue::new("c", "Costa").with_handle(SocialPlatform::Twitter, "none");
        assert_eq!(scorer.score_venue_pair(&c, &c).social, 0.0);
    }

    #[test]
    fn category_signal_is_gated_by_name() {
        let scorer = SimilarityScorer::default();
        let mall = Venue::new("a", "Westfield").with_categories(["mall"]);
        let other = Venue::new("b", "Westfield").with_categories(["office"]);
        assert_eq!(scorer.score_venue_pair(&mall, &other).category, -1.0);

        let shop = Venue::new("c", "Westfield").with_categories(["mall", "shop"]);
        assert_eq!(scorer.score_venue_pair(&mall, &shop).category, 1.0);

        let unknown = Venue::new("d", "Westfield");
        assert_eq!(scorer.score_venue_pair(&mall, &unknown).category, 0.0);

        let far = Venue::new("e", "Eastfield Plaza").with_categories(["office"]);
        assert_eq!(scorer.score_venue_pair(&mall, &far).category, 0.0);
    }

    #[test]
    fn category_only_counts_when_enabled() {
        let score = MatchScore {
            name: 1.0,
            url: 0.0,
            social: 0.0,
            category: -1.0,
        };
        assert_eq!(score.confidence(false), 1.0);
        assert_eq!(score.confidence(true), 0.0);
    }

    #[test]
    fn chain_name_score_is_mean_over_names() {
        let scorer = SimilarityScorer::default();
        let chain = chain_of(&["Tesco", "Tesco Metro"], &[], &["supermarket"]);
        let v = Venue::new("v", "Tesco").with_categories(["supermarket"]);
        let score = scorer.score_venue_against_chain(&v, &chain).unwrap();
        let expected = (1.0 + name_similarity("Tesco", "Tesco Metro")) / 2.0;
        assert!((score.name - expected).abs() < 1e-12);
    }

    #[test]
    fn tesco_express_misses_tesco_chain() {
        let scorer = SimilarityScorer::default();
        let chain = chain_of(&["Tesco", "Tesco Metro"], &[], &["supermarket"]);
        let v = Venue::new("v", "Tesco Express").with_categories(["supermarket"]);
        let score = scorer.score_venue_against_chain(&v, &chain).unwrap();
        assert!(score.name < 0.9);
        assert_eq!(score.category, 0.0);
        assert!(scorer.confidence(&score) < 0.9);
    }

    #[test]
    fn nameless_chain_has_no_score() {
        let scorer = SimilarityScorer::default();
        let chain = Chain::empty();
        assert!(scorer
            .score_venue_against_chain(&Venue::new("v", "X"), &chain)
            .is_none());
    }

    #[test]
    fn chain_url_and_social_membership() {
        let scorer = SimilarityScorer::default();
        let mut chain = chain_of(&["Greggs"], &["greggs.co.uk"], &[]);
        chain.social.twitter.insert("GreggsOfficial".to_string());
        let v = Venue::new("v", "Greggs")
            .with_url("https://www.greggs.co.uk")
            .with_handle(SocialPlatform::Twitter, "GreggsOfficial");
        let score = scorer.score_venue_against_chain(&v, &chain).unwrap();
        assert_eq!((score.url, score.social), (1.0, 1.0));
    }

    #[test]
    fn ties_keep_first_seen() {
        let scorer = SimilarityScorer::default();
        let v = Venue::new("v", "Boots");
        let candidates = vec![Venue::new("a", "Boots"), Venue::new("b", "Boots")];
        let best = scorer.find_best_venue_match(&v, &candidates);
        assert_eq!(best.candidate.map(|c| c.id.as_str()), Some("a"));
        assert_eq!(best.confidence, 1.0);
    }

    #[test]
    fn empty_candidates_have_no_match() {
        let scorer = SimilarityScorer::default();
        let best = scorer.find_best_chain_match(&Venue::new("v", "Boots"), &[]);
        assert!(best.candidate.is_none());
        assert_eq!(best.confidence, 0.0);
        assert!(best.at_least(0.0).is_none());
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let v = Venue::new("v", "Pret A Manger");
        let candidates: Vec<Venue> = (0..200)
            .map(|i| Venue::new(format!("c{i}"), format!("Pret {}", i % 17)))
            .collect();
        let par = SimilarityScorer::default().with_parallel(true);
        let seq = SimilarityScorer::default().with_parallel(false);
        assert_eq!(
            par.venue_confidences(&v, &candidates),
            seq.venue_confidences(&v, &candidates)
        );
        let a = par.find_best_venue_match(&v, &candidates);
        let b = seq.find_best_venue_match(&v, &candidates);
        assert_eq!(a.candidate.map(|c| &c.id), b.candidate.map(|c| &c.id));
    }
}
