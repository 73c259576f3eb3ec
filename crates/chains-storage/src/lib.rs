//! # chains-storage
//!
//! Realizations of the document store contract: an in-memory store for
//! tests and dry runs, and a SQLite store with migrations. Also the static
//! category tree and a venue source answered from the local venue cache.

pub mod category_tree;
pub mod memory;
pub mod sqlite;
pub mod venue_source;

pub use category_tree::StaticCategoryTree;
pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;
pub use venue_source::StoreVenueSource;

pub(crate) use chains_core::errors::to_store_err;
