//! Repository analysis handlers

use super::types::{AnalyzeRepoRequest, AnalyzeRepoResponse, ApiError, ApiErrorBody};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::{error, info, warn};

/// Analyze a public GitHub repository
#[utoipa::path(
    post,
    path = "/api/analyze-repo",
    tag = "Analysis",
    summary = "Analyze repository",
    description = "Shallow-clones the repository, asks Gemini for a deployment analysis and stores it under the repo id",
    request_body = AnalyzeRepoRequest,
    responses(
        (status = 200, description = "Analysis stored", body = AnalyzeRepoResponse),
        (status = 400, description = "Missing or invalid repository URL", body = ApiErrorBody),
        (status = 500, description = "Analysis failed", body = ApiErrorBody),
        (status = 500, description = "Clone, model or parse failure", body = ApiErrorBody)
    )
)]
pub async fn analyze_repo(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRepoRequest>, JsonRejection>,
) -> Result<Json<AnalyzeRepoResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable analyze request body");
            return Err(ApiError::missing_repo_url().with_message(rejection.body_text()));
        }
    };

    let repo_url = request
        .repo_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(ApiError::missing_repo_url)?;

    info!(repo_url = %repo_url, "Analyze repository request");

    let outcome = state.analyzer.analyze(&repo_url).await.map_err(|failure| {
        error!(stage = failure.stage.as_str(), error = %failure.error, "Analysis request failed");
        ApiError::from(failure)
    })?;

    Ok(Json(AnalyzeRepoResponse {
        success: true,
        repo_id: outcome.repo_id,
        analysis: outcome.record,
    }))
}

/// Fetch a stored analysis
#[utoipa::path(
    get,
    path = "/api/analysis/{repo_id}",
    tag = "Analysis",
    summary = "Get analysis",
    params(
        ("repo_id" = String, Path, description = "Repository id, `owner-repo`")
    ),
    responses(
        (status = 200, description = "Stored analysis record"),
        (status = 404, description = "No analysis for this id", body = ApiErrorBody)
    )
)]
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(repo_id): Path<String>,
) -> Result<Json<launchpad_core::AnalysisRecord>, ApiError> {
    match state.analyzer.store().get(&repo_id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => {
            info!(repo_id = %repo_id, "Analysis not found");
            Err(ApiError::not_found())
        }
        Err(e) => {
            e.log();
            Err(ApiError::storage(&e))
        }
    }
}
