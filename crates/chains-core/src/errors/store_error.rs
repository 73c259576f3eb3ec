/// Document store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {message}")]
    Backend { message: String },

    #[error("serialization failed for {collection}: {message}")]
    Serialization { collection: String, message: String },

    #[error("malformed document in {collection}: {reason}")]
    MalformedDocument { collection: String, reason: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("store connection lost: {details}")]
    ConnectionLost { details: String },
}
