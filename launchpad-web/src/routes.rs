//! Route definitions for the Launchpad web server

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// OAuth routes, mounted under `/oauth`
pub fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/github",
            get(handlers::github_oauth_get).post(handlers::github_oauth_post),
        )
        .route("/github/authorize", get(handlers::github_authorize))
}

/// Analysis routes, mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-repo", post(handlers::analyze_repo))
        .route("/analysis/{repo_id}", get(handlers::get_analysis))
}
