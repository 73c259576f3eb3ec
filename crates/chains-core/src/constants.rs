/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Root category id of "Homes and Residences" in the location API's category tree.
pub const HOME_RESIDENCE_ROOT_ID: &str = "4e67e38e036454776db1fb3a";

/// Literal the location API uses for a deliberately empty social handle.
pub const SOCIAL_NONE_SENTINEL: &str = "none";

/// Identifier field every stored document is keyed by.
pub const DOCUMENT_ID_FIELD: &str = "_id";

// --- Collections ---
pub const VENUES_COLLECTION: &str = "venues";
pub const CHAINS_COLLECTION: &str = "chains";
pub const LOOKUP_COLLECTION: &str = "chain_id_lookup";

/// Value of `page.user.type` marking a venue the data source considers a chain.
pub const CHAIN_PAGE_TYPE: &str = "chain";
