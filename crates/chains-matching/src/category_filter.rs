//! Excludes home and residence venues before any matching happens.

use std::sync::Arc;

use chains_core::constants::HOME_RESIDENCE_ROOT_ID;
use chains_core::models::Venue;
use chains_core::traits::ICategoryTree;

#[derive(Clone, Default)]
pub struct CategoryFilter {
    tree: Option<Arc<dyn ICategoryTree>>,
}

impl CategoryFilter {
    pub fn new(tree: Arc<dyn ICategoryTree>) -> Self {
        Self { tree: Some(tree) }
    }

    /// A filter with no hierarchy: only the home root id itself is excluded.
    pub fn without_tree() -> Self {
        Self::default()
    }

    /// True when the venue's primary category is, or descends from, the home root.
    pub fn is_excluded(&self, venue: &Venue) -> bool {
        let Some(primary) = venue.primary_category() else {
            return false;
        };
        if primary == HOME_RESIDENCE_ROOT_ID {
            return true;
        }
        self.tree
            .as_ref()
            .and_then(|tree| tree.root_category_for(primary))
            .is_some_and(|root| root.id == HOME_RESIDENCE_ROOT_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chains_core::models::Category;

    struct OneRoot;

    impl ICategoryTree for OneRoot {
        fn root_category_for(&self, category_id: &str) -> Option<Category> {
            (category_id == "apartment").then(|| Category {
                id: HOME_RESIDENCE_ROOT_ID.to_string(),
                name: "Homes and Residences".to_string(),
            })
        }
    }

    #[test]
    fn descendants_of_home_are_excluded() {
        let filter = CategoryFilter::new(Arc::new(OneRoot));
        assert!(filter.is_excluded(&Venue::new("a", "Flat 3").with_categories(["apartment"])));
        assert!(!filter.is_excluded(&Venue::new("b", "Costa").with_categories(["coffee"])));
    }

    #[test]
    fn only_primary_category_counts() {
        let filter = CategoryFilter::new(Arc::new(OneRoot));
        let venue = Venue::new("a", "Hotel").with_categories(["hotel", "apartment"]);
        assert!(!filter.is_excluded(&venue));
    }

    #[test]
    fn uncategorized_is_kept_and_root_id_is_excluded_without_tree() {
        let filter = CategoryFilter::without_tree();
        assert!(!filter.is_excluded(&Venue::new("a", "Nowhere")));
        let home = Venue::new("b", "Home").with_categories([HOME_RESIDENCE_ROOT_ID]);
        assert!(filter.is_excluded(&home));
    }
}
