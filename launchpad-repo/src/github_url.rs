//! Strict GitHub repository URL handling

use launchpad_core::{validation_error, LaunchpadResult};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

pub const GITHUB_PREFIX: &str = "https://github.com/";

static REPO_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$")
        .expect("repository URL pattern is valid")
});

/// A validated `https://github.com/<owner>/<repo>` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepoUrl {
    pub owner: String,
    pub name: String,
    url: String,
}

impl GitHubRepoUrl {
    /// Accept only `https://github.com/<owner>/<repo>` with nothing after the repo segment
    pub fn parse(input: &str) -> LaunchpadResult<Self> {
        let invalid = || {
            validation_error!(
                format!(
                    "'{}' is not a GitHub repository URL of the form https://github.com/<owner>/<repo>",
                    input
                ),
                "repoUrl",
                "github_url"
            )
        };

        let captures = REPO_URL_PATTERN.captures(input).ok_or_else(invalid)?;
        let owner = &captures[1];
        let name = &captures[2];

        if [owner, name].iter().any(|s| *s == "." || *s == "..") {
            return Err(invalid());
        }

        let parsed = Url::parse(input).map_err(|_| invalid())?;
        if parsed.host_str() != Some("github.com") || parsed.port().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            url: input.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Identifier under which the analysis is stored: the URL without the
    /// GitHub prefix, first `/` replaced by `-`.
    pub fn repo_id(&self) -> String {
        self.url
            .strip_prefix(GITHUB_PREFIX)
            .unwrap_or(&self.url)
            .replacen('/', "-", 1)
    }
}

impl std::fmt::Display for GitHubRepoUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_repo_url() {
        let url = GitHubRepoUrl::parse("https://github.com/vercel/next.js").unwrap();
        assert_eq!(url.owner, "vercel");
        assert_eq!(url.name, "next.js");
        assert_eq!(url.as_str(), "https://github.com/vercel/next.js");
        assert_eq!(url.repo_id(), "vercel-next.js");
    }

    #[test]
    fn test_rejects_other_shapes() {
        let rejected = [
            "github.com/octo/demo",
            "http://github.com/octo/demo",
            "https://gitlab.com/octo/demo",
            "https://github.com.evil.io/octo/demo",
            "https://github.com/octo",
            "https://github.com/octo/demo/tree/main",
            "https://github.com/octo/demo/",
            "https://github.com/octo/demo?tab=readme",
            "https://github.com/octo/demo#readme",
            "https://github.com:8443/octo/demo",
            "https://user@github.com/octo/demo",
            "https://github.com/../demo",
            " https://github.com/octo/demo",
            "",
        ];

        for input in rejected {
            assert!(GitHubRepoUrl::parse(input).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_rejection_is_a_validation_error() {
        let err = GitHubRepoUrl::parse("https://example.com/a/b").unwrap_err();
        assert!(err.is_client_error());
    }
}
