//! Mapping store error types.

use thiserror::Error;

/// Errors that can occur while reading or writing the mapping artifact.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The mapping file does not exist yet.
    #[error("Mapping file not found at '{path}'. Run the migration phase first.")]
    Missing { path: String },

    /// The mapping file exists but does not hold a valid mapping document.
    #[error("Mapping file at '{path}' is corrupt: {message}")]
    Corrupt { path: String, message: String },

    /// Failed to read or write the mapping file.
    #[error("Failed to access mapping file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode the mapping document as JSON.
    #[error("Failed to encode mapping document: {0}")]
    EncodeError(#[from] serde_json::Error),
}
