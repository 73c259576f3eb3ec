//! Category hierarchy loaded from the location API's nested category JSON.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use chains_core::errors::{ChainsResult, ConfigError, SourceError};
use chains_core::models::Category;
use chains_core::traits::ICategoryTree;

/// Flattened category tree: every known id maps to its top-level ancestor.
#[derive(Debug, Clone, Default)]
pub struct StaticCategoryTree {
    roots: HashMap<String, Category>,
}

impl StaticCategoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `{"response": {"categories": [...]}}` or a bare array of
    /// `{id, name, categories: [...]}` nodes.
    pub fn from_json(payload: &Value) -> ChainsResult<Self> {
        let top = payload
            .pointer("/response/categories")
            .or_else(|| payload.get("categories"))
            .unwrap_or(payload)
            .as_array()
            .ok_or_else(|| SourceError::Malformed {
                reason: "category tree is not an array".to_string(),
            })?;

        let mut tree = Self::new();
        for node in top {
            let root = parse_category(node)?;
            tree.insert_subtree(&root, node)?;
        }
        Ok(tree)
    }

    pub fn from_file(path: &Path) -> ChainsResult<Self> {
        let display = path.display().to_string();
        let source = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: display.clone() })?;
        let payload: Value = serde_json::from_str(&source).map_err(|e| ConfigError::ParseError {
            path: display,
            message: e.to_string(),
        })?;
        Self::from_json(&payload)
    }

    /// Register a root and the ids of its descendants.
    pub fn with_root<I, S>(mut self, root: Category, descendants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in descendants {
            self.roots.insert(id.into(), root.clone());
        }
        self.roots.insert(root.id.clone(), root);
        self
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    fn insert_subtree(&mut self, root: &Category, node: &Value) -> ChainsResult<()> {
        let id = parse_category(node)?.id;
        self.roots.insert(id, root.clone());
        if let Some(children) = node.get("categories").and_then(Value::as_array) {
            for child in children {
                self.insert_subtree(root, child)?;
            }
        }
        Ok(())
    }
}

fn parse_category(node: &Value) -> ChainsResult<Category> {
    let id = node.get("id").and_then(Value::as_str);
    let name = node.get("name").and_then(Value::as_str);
    match (id, name) {
        (Some(id), Some(name)) => Ok(Category {
            id: id.to_string(),
            name: name.to_string(),
        }),
        _ => Err(SourceError::Malformed {
            reason: "category node needs string 'id' and 'name'".to_string(),
        }
        .into()),
    }
}

impl ICategoryTree for StaticCategoryTree {
    fn root_category_for(&self, category_id: &str) -> Option<Category> {
        self.roots.get(category_id).cloned()
    }
}
