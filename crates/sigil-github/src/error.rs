//! Error types for README fetching.

use thiserror::Error;

/// Errors that can occur while fetching a README.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The input does not name an `owner/repo`.
    #[error("invalid repository url: {0}")]
    InvalidRepoUrl(String),

    /// The repository or its README does not exist.
    #[error("no README found for {0}")]
    NotFound(String),

    /// GitHub answered with a non-success status.
    #[error("github error: {status} - {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl GithubError {
    /// Returns whether the caller supplied bad input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRepoUrl(_) | Self::NotFound(_))
    }
}

/// Result type for README operations.
pub type Result<T> = std::result::Result<T, GithubError>;
