//! Runner error types.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::mapping::MappingError;

/// Errors that can occur while running a migration phase.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Remote gateway errors.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Mapping artifact errors.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Failed to write the comment-migration log.
    #[error("Failed to write migration log '{path}': {source}")]
    LogWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode the comment-migration log.
    #[error("Failed to encode migration log: {0}")]
    LogEncode(#[from] serde_json::Error),
}
