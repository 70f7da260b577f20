//! Repository snapshot fetching
//!
//! Clones with the system `git` binary, the same way a developer would by hand.

use async_trait::async_trait;
use launchpad_core::{ErrorContext, LaunchpadError, LaunchpadResult};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::GitHubRepoUrl;

/// Produces a working-tree snapshot of a repository at `target`
#[async_trait]
pub trait RepositoryFetcher: Send + Sync {
    async fn fetch(&self, repo: &GitHubRepoUrl, target: &Path) -> LaunchpadResult<()>;
}

/// Shallow `git clone` of the default branch
#[derive(Debug, Clone)]
pub struct GitCloneFetcher {
    depth: u32,
    git_binary: String,
}

impl GitCloneFetcher {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            git_binary: "git".to_string(),
        }
    }

    /// Use a specific git executable instead of the one on `PATH`
    pub fn with_git_binary(mut self, git_binary: impl Into<String>) -> Self {
        self.git_binary = git_binary.into();
        self
    }

    fn build_command(&self, url: &str, target: &Path) -> Command {
        let mut cmd = Command::new(&self.git_binary);
        cmd.arg("clone")
            .arg("--quiet")
            .arg("--depth")
            .arg(self.depth.to_string())
            .arg("--single-branch")
            .arg(url)
            .arg(target)
            // never block on a credential prompt for private or missing repos
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);
        cmd
    }
}

impl Default for GitCloneFetcher {
    fn default() -> Self {
        Self::new(1)
    }
}

#[async_trait]
impl RepositoryFetcher for GitCloneFetcher {
    async fn fetch(&self, repo: &GitHubRepoUrl, target: &Path) -> LaunchpadResult<()> {
        info!(
            repo_url = %repo,
            target_path = %target.display(),
            depth = self.depth,
            "Starting repository clone"
        );

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LaunchpadError::Repository {
                    message: format!("Failed to create parent directory: {}", e),
                    source: Some(Box::new(e)),
                    context: ErrorContext::new("git_clone_fetcher").with_operation("fetch"),
                })?;
        }

        let output = self
            .build_command(repo.as_str(), target)
            .output()
            .await
            .map_err(|e| LaunchpadError::Repository {
                message: format!("Failed to execute git clone: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("git_clone_fetcher")
                    .with_operation("fetch")
                    .with_suggestion("Ensure git is installed and accessible"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(repo_url = %repo, stderr = %stderr.trim(), "git clone failed");
            return Err(LaunchpadError::Git {
                message: format!("Git clone failed: {}", stderr.trim()),
                context: ErrorContext::new("git_clone_fetcher")
                    .with_operation("fetch")
                    .with_metadata("repo_url", repo.as_str())
                    .with_suggestion("Check that the repository exists and is public"),
            });
        }

        info!(repo_url = %repo, target_path = %target.display(), "Repository cloned successfully");
        Ok(())
    }
}
