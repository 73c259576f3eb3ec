use crate::models::Category;

/// Static category hierarchy lookup.
pub trait ICategoryTree: Send + Sync {
    /// The top-level ancestor of a category, or `None` for unknown ids.
    fn root_category_for(&self, category_id: &str) -> Option<Category>;
}
