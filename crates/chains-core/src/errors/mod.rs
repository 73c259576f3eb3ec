//! Error taxonomy for chain resolution.
//!
//! `ChainsError` is the single error type crossing crate boundaries.
//! Subsystem errors convert into it via `From`.

mod config_error;
mod source_error;
mod store_error;

pub use config_error::ConfigError;
pub use source_error::SourceError;
pub use store_error::StoreError;

/// Result alias used throughout the workspace.
pub type ChainsResult<T> = Result<T, ChainsError>;

/// Top-level error for every chain resolution operation.
#[derive(Debug, thiserror::Error)]
pub enum ChainsError {
    /// A venue is already owned by a different chain. Aborts the mutation only.
    #[error("venue '{venue_id}' already in chain '{chain_id}'")]
    AlreadyInChain { venue_id: String, chain_id: String },

    #[error("chain not found: {chain_id}")]
    ChainNotFound { chain_id: String },

    /// More than one existing chain cleared the threshold for the same venue.
    #[error("ambiguous chain match for venue '{venue_id}': {} candidates ({})", .candidates.len(), .candidates.join(", "))]
    AmbiguousChainMatch {
        venue_id: String,
        candidates: Vec<String>,
    },

    /// A stored chain has no members or names to score against.
    #[error("chain '{chain_id}' is empty")]
    EmptyChain { chain_id: String },

    #[error("venue not found: {venue_id}")]
    MissingVenue { venue_id: String },

    #[error(transparent)]
    StoreError(#[from] StoreError),

    #[error(transparent)]
    SourceError(#[from] SourceError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),
}

impl ChainsError {
    /// Whether a batch can skip the current venue and keep going.
    ///
    /// Only a lost store connection is fatal to a whole run.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ChainsError::StoreError(StoreError::ConnectionLost { .. }))
    }
}

/// Wrap any displayable error as a storage failure.
pub fn to_store_err(message: impl Into<String>) -> ChainsError {
    ChainsError::StoreError(StoreError::Backend {
        message: message.into(),
    })
}
