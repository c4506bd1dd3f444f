//! Error types for blueprint-core

use std::path::PathBuf;

/// Result type for blueprint-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in blueprint-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Schema document not found at the expected path
    #[error("Document not found at {path}")]
    DocumentNotFound { path: PathBuf },

    /// No converter registered for a record variant
    #[error("No converter registered for variant: {variant}")]
    UnknownVariant { variant: String },

    /// A handle or id could not be mapped against a live collection.
    /// Only surfaced under strict import; lenient import degrades this
    /// to a warning.
    #[error("Unresolved {collection} reference: {identifier}")]
    UnresolvedReference {
        collection: String,
        identifier: String,
    },
}
