//! # Sigil GitHub
//!
//! README fetching for the summarization flow.
//!
//! [`ReadmeClient`] calls `GET /repos/{owner}/{name}/readme` with the raw
//! media type. Setting a token raises GitHub's rate limit. Pagination and
//! rate-limit backoff are not handled.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
mod repo;

pub use client::{Readme, ReadmeClient, ReadmeClientConfig, ReadmeSource, DEFAULT_API_BASE};
pub use error::{GithubError, Result};
pub use repo::RepoRef;

/// Environment variable holding an optional GitHub token.
pub const TOKEN_ENV: &str = "GH_TOKEN";
