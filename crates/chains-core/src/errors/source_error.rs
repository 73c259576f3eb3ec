/// Venue source (location API) errors. Always recoverable per venue.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("venue source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("venue not found at source: {venue_id}")]
    NotFound { venue_id: String },

    #[error("malformed venue payload: {reason}")]
    Malformed { reason: String },

    #[error("operation not supported by this venue source: {operation}")]
    Unsupported { operation: String },
}
