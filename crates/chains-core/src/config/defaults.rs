// Single source of truth for all default values.

// --- Matching ---
pub const DEFAULT_REQUIRED_CHAIN_CONFIDENCE: f64 = 0.9;
pub const DEFAULT_REQUIRED_VENUE_CONFIDENCE: f64 = 0.9;
pub const DEFAULT_CATEGORY_GATE: f64 = 0.9;
pub const DEFAULT_INCLUDE_CATEGORY_IN_CONFIDENCE: bool = false;
pub const DEFAULT_SEED_CHAIN_FROM_HINT: bool = true;
pub const DEFAULT_GLOBAL_SEARCH: bool = false;
pub const DEFAULT_PARALLEL_SCORING: bool = true;
pub const DEFAULT_PRUNE_THRESHOLD: f64 = 0.9;

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "chains.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
