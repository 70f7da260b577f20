//! Launchpad Web Server
//!
//! HTTP surface of the backend: the GitHub OAuth token proxy, the repository
//! analysis API and a health probe.

pub mod handlers;
pub mod oauth;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::{LaunchpadServer, LaunchpadServerBuilder};
pub use state::AppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.frontend_origin);

    Router::new()
        // GitHub OAuth proxy
        .nest("/oauth", routes::oauth_routes())
        // Analysis API
        .nest("/api", routes::api_routes())
        .route("/health", get(handlers::health_check))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// CORS for the single frontend origin, with credentials
fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value),
        Err(e) => {
            warn!(origin, error = %e, "Invalid frontend origin, cross-origin requests will be refused");
            cors
        }
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;
