//! Repository analysis orchestration
//!
//! validate URL -> scratch dir -> shallow clone -> metadata -> prompt ->
//! model -> JSON -> store. The scratch directory is removed on every path.

use launchpad_core::{
    log_operation_error, log_operation_start, log_operation_success, performance::measure_async,
    AnalysisPayload, AnalysisRecord, LaunchpadError,
};
use launchpad_repo::{GitHubRepoUrl, MetadataExtractor, RepositoryFetcher, ScratchDir};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::extract::parse_analysis;
use crate::gemini::GenerativeModel;
use crate::prompt::build_analysis_prompt;
use crate::store::AnalysisStore;

/// Where an analysis attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStage {
    Validation,
    Configuration,
    Scratch,
    Clone,
    Generate,
    Parse,
    Store,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::Validation => "validation",
            AnalysisStage::Configuration => "configuration",
            AnalysisStage::Scratch => "scratch",
            AnalysisStage::Clone => "clone",
            AnalysisStage::Generate => "generate",
            AnalysisStage::Parse => "parse",
            AnalysisStage::Store => "store",
        }
    }
}

/// An analysis error tagged with the stage that produced it
#[derive(Debug, Error)]
#[error("analysis failed during {}: {error}", stage.as_str())]
pub struct AnalysisFailure {
    pub stage: AnalysisStage,
    #[source]
    pub error: LaunchpadError,
}

impl AnalysisFailure {
    fn at(stage: AnalysisStage) -> impl FnOnce(LaunchpadError) -> Self {
        move |error| Self { stage, error }
    }
}

/// Result of a successful analysis
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub repo_id: String,
    pub record: AnalysisRecord,
}

pub struct RepositoryAnalyzer {
    fetcher: Arc<dyn RepositoryFetcher>,
    model: Arc<dyn GenerativeModel>,
    store: Arc<dyn AnalysisStore>,
    extractor: MetadataExtractor,
    scratch_root: PathBuf,
}

impl RepositoryAnalyzer {
    pub fn new(
        fetcher: Arc<dyn RepositoryFetcher>,
        model: Arc<dyn GenerativeModel>,
        store: Arc<dyn AnalysisStore>,
        scratch_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            model,
            store,
            extractor: MetadataExtractor::default(),
            scratch_root: scratch_root.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn AnalysisStore> {
        &self.store
    }

    pub fn model_configured(&self) -> bool {
        self.model.is_configured()
    }

    /// Analyze `repo_url` and store the result under its repo id
    pub async fn analyze(&self, repo_url: &str) -> Result<AnalysisOutcome, AnalysisFailure> {
        let repo = GitHubRepoUrl::parse(repo_url).map_err(AnalysisFailure::at(AnalysisStage::Validation))?;

        if !self.model.is_configured() {
            return Err(AnalysisFailure {
                stage: AnalysisStage::Configuration,
                error: launchpad_core::config_error!(
                    "Gemini API key not configured",
                    "repository_analyzer"
                ),
            });
        }

        log_operation_start!("analyze_repository", repo_url = %repo);

        let scratch = ScratchDir::allocate(&self.scratch_root)
            .await
            .map_err(AnalysisFailure::at(AnalysisStage::Scratch))?;
        let result = self.run(&repo, scratch.path()).await;
        scratch.cleanup().await;

        let payload = match result {
            Ok(payload) => payload,
            Err(failure) => {
                log_operation_error!(
                    "analyze_repository",
                    failure.error,
                    repo_url = %repo,
                    stage = failure.stage.as_str()
                );
                return Err(failure);
            }
        };

        let repo_id = repo.repo_id();
        let record = AnalysisRecord::new(payload, repo.as_str());
        self.store
            .set(&repo_id, record.clone())
            .await
            .map_err(AnalysisFailure::at(AnalysisStage::Store))?;

        log_operation_success!(
            "analyze_repository",
            repo_id = %repo_id,
            stack = record.analysis.str_field("stack").unwrap_or("unknown")
        );
        Ok(AnalysisOutcome { repo_id, record })
    }

    async fn run(
        &self,
        repo: &GitHubRepoUrl,
        workdir: &Path,
    ) -> Result<AnalysisPayload, AnalysisFailure> {
        measure_async("git_clone", self.fetcher.fetch(repo, workdir))
            .await
            .map_err(AnalysisFailure::at(AnalysisStage::Clone))?;

        let bundle = self.extractor.extract(workdir).await;
        tracing::debug!(
            repo_url = %repo,
            other_manifests = bundle.other_manifests.len(),
            tree_lines = bundle.file_tree.lines().count(),
            "Extracted repository metadata"
        );

        let prompt = build_analysis_prompt(repo.as_str(), &bundle);
        let text = measure_async("gemini_generate", self.model.generate(&prompt))
            .await
            .map_err(AnalysisFailure::at(AnalysisStage::Generate))?;

        parse_analysis(&text).map_err(AnalysisFailure::at(AnalysisStage::Parse))
    }
}
