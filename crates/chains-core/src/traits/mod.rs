mod category_tree;
mod document_store;
mod venue_source;

pub use category_tree::ICategoryTree;
pub use document_store::{document_id, lookup_path, DocumentQuery, IDocumentStore};
pub use venue_source::IVenueSource;
