//! Gateway error types.

use thiserror::Error;

/// Errors that can occur while talking to the remote ticket gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// Malformed repository identifier.
    #[error("Invalid repository identifier '{input}': expected 'owner/name'")]
    InvalidRepo { input: String },
}
