//! OpenAPI specification for the Launchpad backend

use axum::response::Json;
use utoipa::OpenApi;

use crate::handlers::{
    AnalyzeRepoRequest, AnalyzeRepoResponse, ApiErrorBody, AuthorizeResponse, HealthResponse,
    OAuthCodeParams, TokenResponse,
};
use crate::oauth::OAuthErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Launchpad API",
        version = "0.1.0",
        description = "GitHub OAuth token proxy and AI deployment analysis of GitHub repositories",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,

        crate::handlers::github_oauth_get,
        crate::handlers::github_oauth_post,
        crate::handlers::github_authorize,

        crate::handlers::analyze_repo,
        crate::handlers::get_analysis,
    ),
    components(
        schemas(
            HealthResponse,
            OAuthCodeParams,
            TokenResponse,
            AuthorizeResponse,
            OAuthErrorBody,
            AnalyzeRepoRequest,
            AnalyzeRepoResponse,
            ApiErrorBody,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "OAuth", description = "GitHub authorization-code exchange"),
        (name = "Analysis", description = "Repository deployment analysis"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
