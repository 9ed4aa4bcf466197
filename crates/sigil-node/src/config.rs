//! Node configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line flags and their environment variables.

use clap::Parser;
use serde::{Deserialize, Serialize};
use sigil_github::{ReadmeClientConfig, DEFAULT_API_BASE};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::observability::LogFormat;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`NodeConfig`].
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: serde_yaml::Error,
    },
}

/// Configuration for the Sigil node.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// HTTP listen address.
    pub listen_addr: SocketAddr,
    /// Location of the persisted identity key.
    pub key_path: PathBuf,
    /// Artifact to fingerprint. Defaults to the running executable.
    pub fingerprint_path: Option<PathBuf>,
    /// GitHub API base URL.
    pub github_api: String,
    /// GitHub token. Never written back out.
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    /// GitHub request timeout in seconds.
    pub github_timeout_secs: u64,
    /// Maximum summary length in characters.
    pub summary_max_chars: usize,
    /// Log level.
    pub log_level: String,
    /// Log format, `pretty` or `json`.
    pub log_format: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            key_path: PathBuf::from(sigil_identity::DEFAULT_KEY_PATH),
            fingerprint_path: None,
            github_api: DEFAULT_API_BASE.to_string(),
            github_token: None,
            github_timeout_secs: 20,
            summary_max_chars: 600,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl NodeConfig {
    /// Loads a YAML config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the parsed log format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format)
    }

    /// Returns settings for the README client.
    #[must_use]
    pub fn readme_client_config(&self) -> ReadmeClientConfig {
        ReadmeClientConfig {
            api_base: self.github_api.clone(),
            token: self.github_token.clone(),
            timeout: Duration::from_secs(self.github_timeout_secs),
        }
    }
}

/// Sigil Node - README summarizing agent with a stable DID
#[derive(Parser, Debug, Default)]
#[command(name = "sigil-node")]
#[command(author, version, about, long_about = None)]
pub struct NodeArgs {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "SIGIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// HTTP listen address [default: 0.0.0.0:8000]
    #[arg(long, env = "SIGIL_LISTEN_ADDR")]
    pub listen_addr: Option<SocketAddr>,

    /// Identity key file [default: .agent_key.jwk]
    #[arg(long, env = "SIGIL_KEY_PATH")]
    pub key_path: Option<PathBuf>,

    /// File to fingerprint [default: this executable]
    #[arg(long, env = "SIGIL_FINGERPRINT_PATH")]
    pub fingerprint_path: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, env = "SIGIL_GITHUB_API")]
    pub github_api: Option<String>,

    /// GitHub token for a higher rate limit
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SIGIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long, env = "SIGIL_LOG_FORMAT")]
    pub log_format: Option<String>,
}

impl NodeArgs {
    /// Builds the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names an unreadable or invalid file.
    pub fn into_config(self) -> Result<NodeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_yaml_file(path)?,
            None => NodeConfig::default(),
        };

        if let Some(addr) = self.listen_addr {
            config.listen_addr = addr;
        }
        if let Some(path) = self.key_path {
            config.key_path = path;
        }
        if let Some(path) = self.fingerprint_path {
            config.fingerprint_path = Some(path);
        }
        if let Some(api) = self.github_api {
            config.github_api = api;
        }
        if let Some(token) = self.github_token.filter(|t| !t.is_empty()) {
            config.github_token = Some(token);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}
