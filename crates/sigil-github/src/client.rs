//! # README Client
//!
//! Fetches raw README text through the GitHub REST API.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::{GithubError, RepoRef, Result};

/// Public GitHub API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Media type that makes GitHub return the README body instead of JSON.
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// A fetched README.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readme {
    /// `owner/name` of the repository.
    pub display_name: String,
    /// Raw README text.
    pub text: String,
}

/// Anything that can turn a repository URL into its README.
#[async_trait]
pub trait ReadmeSource: Send + Sync {
    /// Fetches the README of the repository at `repo_url`.
    async fn fetch_readme(&self, repo_url: &str) -> Result<Readme>;
}

/// Settings for [`ReadmeClient`].
#[derive(Clone)]
pub struct ReadmeClientConfig {
    /// API base URL, without a trailing slash.
    pub api_base: String,
    /// Optional token; raises GitHub's rate limit.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ReadmeClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            timeout: Duration::from_secs(20),
        }
    }
}

impl fmt::Debug for ReadmeClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadmeClientConfig")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the GitHub README endpoint.
///
/// The client is cheaply cloneable and can be shared across tasks.
///
/// # Examples
///
/// ```rust,ignore
/// use sigil_github::{ReadmeClient, ReadmeClientConfig};
///
/// let client = ReadmeClient::new(ReadmeClientConfig::default())?;
/// let readme = client.fetch("https://github.com/rust-lang/cargo").await?;
/// println!("{}: {} bytes", readme.display_name, readme.text.len());
/// ```
#[derive(Clone)]
pub struct ReadmeClient {
    config: ReadmeClientConfig,
    http: Client,
}

impl ReadmeClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Network`] if the HTTP client cannot be built.
    pub fn new(mut config: ReadmeClientConfig) -> Result<Self> {
        config.api_base = config.api_base.trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("sigil/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    /// Returns the configured API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.config.api_base
    }

    /// Fetches the README of the repository at `repo_url`.
    ///
    /// # Errors
    ///
    /// * [`GithubError::InvalidRepoUrl`] - `repo_url` names no repository
    /// * [`GithubError::NotFound`] - repository or README missing
    /// * [`GithubError::Status`] - any other non-success response
    /// * [`GithubError::Network`] - the request failed
    pub async fn fetch(&self, repo_url: &str) -> Result<Readme> {
        let repo = RepoRef::parse(repo_url)?;
        self.fetch_repo(&repo).await
    }

    /// Fetches the README of a parsed repository reference.
    ///
    /// # Errors
    ///
    /// See [`ReadmeClient::fetch`].
    pub async fn fetch_repo(&self, repo: &RepoRef) -> Result<Readme> {
        let url = format!(
            "{}/repos/{}/{}/readme",
            self.config.api_base, repo.owner, repo.name
        );

        let mut request = self
            .http
            .get(&url)
            .header(header::ACCEPT, RAW_MEDIA_TYPE);
        if let Some(token) = &self.config.token {
            request = request.header(header::AUTHORIZATION, format!("token {token}"));
        }

        let res = request.send().await?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GithubError::NotFound(repo.full_name()));
        }
        if !status.is_success() {
            return Err(GithubError::Status {
                status: status.as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }

        let text = res.text().await?;
        tracing::info!(repo = %repo, bytes = text.len(), "Fetched README");
        Ok(Readme {
            display_name: repo.full_name(),
            text,
        })
    }
}

#[async_trait]
impl ReadmeSource for ReadmeClient {
    async fn fetch_readme(&self, repo_url: &str) -> Result<Readme> {
        self.fetch(repo_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, token: Option<&str>) -> ReadmeClient {
        ReadmeClient::new(ReadmeClientConfig {
            api_base: format!("{}/", server.uri()),
            token: token.map(str::to_string),
            ..ReadmeClientConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_raw_readme() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/readme"))
            .and(header("accept", RAW_MEDIA_TYPE))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Hello\n\nWorld"))
            .expect(1)
            .mount(&server)
            .await;

        let readme = client(&server, None)
            .fetch("https://github.com/octocat/hello")
            .await
            .unwrap();

        assert_eq!(readme.display_name, "octocat/hello");
        assert_eq!(readme.text, "# Hello\n\nWorld");
    }

    #[tokio::test]
    async fn sends_token_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/readme"))
            .and(header("authorization", "token s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let readme = client(&server, Some("s3cret"))
            .fetch("octocat/hello")
            .await
            .unwrap();
        assert_eq!(readme.text, "ok");
    }

    #[tokio::test]
    async fn missing_readme_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server, None).fetch("octocat/nope").await.unwrap_err();
        assert!(matches!(err, GithubError::NotFound(ref r) if r == "octocat/nope"));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn upstream_failure_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = client(&server, None).fetch("octocat/hello").await.unwrap_err();
        match err {
            GithubError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn invalid_url_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server, None).fetch("not-a-repo").await.unwrap_err();
        assert!(matches!(err, GithubError::InvalidRepoUrl(_)));
    }

    #[test]
    fn config_debug_redacts_token() {
        let config = ReadmeClientConfig {
            token: Some("ghp_secret".into()),
            ..ReadmeClientConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("api.github.com"));
    }
}
