use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use chains_core::config::ChainsConfig;
use chains_core::traits::{ICategoryTree, IDocumentStore};
use chains_matching::{CategoryFilter, ChainStore, Resolver, VenueCache};
use chains_storage::{SqliteDocumentStore, StaticCategoryTree};

/// Everything a subcommand needs, opened once per invocation.
pub struct App {
    pub config: ChainsConfig,
    pub store: Arc<dyn IDocumentStore>,
    pub filter: CategoryFilter,
}

impl App {
    pub fn open(config: ChainsConfig) -> anyhow::Result<Self> {
        let store = SqliteDocumentStore::from_config(&config.storage)
            .with_context(|| format!("opening database {}", config.storage.db_path))?;
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: ChainsConfig, store: Arc<dyn IDocumentStore>) -> anyhow::Result<Self> {
        let filter = match &config.storage.category_tree_path {
            Some(path) => {
                let tree = StaticCategoryTree::from_file(Path::new(path))
                    .with_context(|| format!("loading category tree {path}"))?;
                CategoryFilter::new(Arc::new(tree) as Arc<dyn ICategoryTree>)
            }
            None => {
                tracing::warn!("no category tree configured, home exclusion limited to the root id");
                CategoryFilter::without_tree()
            }
        };
        Ok(Self {
            config,
            store,
            filter,
        })
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(
            self.store.clone(),
            self.filter.clone(),
            self.config.matching.clone(),
        )
    }

    pub fn chains(&self) -> ChainStore {
        ChainStore::new(self.store.clone())
    }

    pub fn venues(&self) -> VenueCache {
        VenueCache::new(self.store.clone())
    }
}
