//! Application state shared by all handlers

use crate::oauth::GitHubOAuthClient;
use launchpad_analysis::{GeminiClient, MemoryAnalysisStore, RepositoryAnalyzer};
use launchpad_core::ServiceConfig;
use launchpad_repo::GitCloneFetcher;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<ServiceConfig>,
    /// GitHub token exchange client
    pub oauth: GitHubOAuthClient,
    /// Clone, prompt and store pipeline
    pub analyzer: Arc<RepositoryAnalyzer>,
}

impl AppState {
    /// Wire the production components: system `git`, Gemini and the in-memory store
    pub fn new(config: ServiceConfig) -> Self {
        let http = reqwest::Client::new();

        let oauth = GitHubOAuthClient::with_client(http.clone(), config.oauth.clone());
        let analyzer = RepositoryAnalyzer::new(
            Arc::new(GitCloneFetcher::new(config.analysis.clone_depth)),
            Arc::new(GeminiClient::with_client(http, config.gemini.clone())),
            Arc::new(MemoryAnalysisStore::new()),
            config.analysis.scratch_dir.clone(),
        );

        info!(
            scratch_dir = %config.analysis.scratch_dir.display(),
            clone_depth = config.analysis.clone_depth,
            "Application state initialized"
        );

        Self::with_components(config, oauth, analyzer)
    }

    /// Assemble state from prebuilt parts
    pub fn with_components(
        config: ServiceConfig,
        oauth: GitHubOAuthClient,
        analyzer: RepositoryAnalyzer,
    ) -> Self {
        Self {
            config: Arc::new(config),
            oauth,
            analyzer: Arc::new(analyzer),
        }
    }
}
