//! Repository references.

use crate::{GithubError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An `owner/name` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Account or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Parses a repository URL or `owner/name` shorthand.
    ///
    /// Accepted forms:
    /// - `https://github.com/owner/name`, optionally with `.git`, a trailing
    ///   slash, or deeper paths such as `/tree/main`
    /// - the same without a scheme, e.g. `github.com/owner/name`
    /// - `owner/name`
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::InvalidRepoUrl`] if no owner and name can be
    /// found or if either contains characters GitHub does not allow.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || GithubError::InvalidRepoUrl(trimmed.to_string());

        let segments: Vec<String> = if trimmed.contains("://") {
            let url = Url::parse(trimmed).map_err(|_| invalid())?;
            url.path_segments()
                .ok_or_else(invalid)?
                .filter(|s| !s.is_empty())
                .take(2)
                .map(str::to_string)
                .collect()
        } else {
            let mut parts: Vec<&str> = trimmed.trim_end_matches('/').split('/').collect();
            // Owners never contain '.', so a dotted first segment is a host:
            // `github.com/owner/name/tree/main`.
            if parts[0].contains('.') {
                parts.remove(0);
                parts.truncate(2);
            }
            parts.into_iter().map(str::to_string).collect()
        };

        let [owner, name] = <[String; 2]>::try_from(segments).map_err(|_| invalid())?;
        let name = name.strip_suffix(".git").map_or(name.clone(), str::to_string);

        if !is_valid_segment(&owner) || !is_valid_segment(&name) {
            return Err(invalid());
        }
        Ok(Self { owner, name })
    }

    /// Returns the `owner/name` display form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn is_valid_segment(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn repo(owner: &str, name: &str) -> RepoRef {
        RepoRef {
            owner: owner.into(),
            name: name.into(),
        }
    }

    #[test]
    fn parses_plain_url() {
        assert_eq!(
            RepoRef::parse("https://github.com/rust-lang/cargo").unwrap(),
            repo("rust-lang", "cargo")
        );
    }

    #[test]
    fn parses_url_variants() {
        for input in [
            "https://github.com/rust-lang/cargo/",
            "https://github.com/rust-lang/cargo.git",
            "https://github.com/rust-lang/cargo/tree/master/src",
            "  https://github.com/rust-lang/cargo  ",
            "rust-lang/cargo",
            "rust-lang/cargo/",
            "github.com/rust-lang/cargo",
            "www.github.com/rust-lang/cargo",
            "github.com/rust-lang/cargo.git",
            "github.com/rust-lang/cargo/tree/master",
        ] {
            assert_eq!(RepoRef::parse(input).unwrap(), repo("rust-lang", "cargo"), "{input}");
        }
    }

    #[test]
    fn rejects_incomplete_input() {
        for input in [
            "",
            "cargo",
            "https://github.com/rust-lang",
            "https://github.com/",
            "a/b/c",
            "github.com/rust-lang",
            "owner/na me",
            "../etc",
        ] {
            assert!(RepoRef::parse(input).is_err(), "{input}");
        }
    }

    #[test]
    fn display_is_full_name() {
        let r = repo("octocat", "Hello-World");
        assert_eq!(r.to_string(), "octocat/Hello-World");
        assert_eq!(r.full_name(), r.to_string());
    }
}
