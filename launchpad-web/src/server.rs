//! Launchpad Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use launchpad_core::ServiceConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main Launchpad web server
pub struct LaunchpadServer {
    config: ServiceConfig,
    state: AppState,
}

impl LaunchpadServer {
    /// Create a server with production components
    pub fn new(config: ServiceConfig) -> WebResult<Self> {
        config
            .validate()
            .map_err(|e| WebError::Config(e.message()))?;

        let state = AppState::new(config.clone());
        Ok(Self { config, state })
    }

    /// Create a server around prebuilt state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.as_ref().clone(),
            state,
        }
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.server.address();

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        let local = listener.local_addr().map_err(WebError::Server)?;
        info!(address = %local, "Backend server started");
        info!("GitHub OAuth endpoint: http://{}/oauth/github", local);
        info!("Analysis endpoint: http://{}/api/analyze-repo", local);
        info!("Health check: http://{}/health", local);

        let app = create_app(self.state.clone());

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!(error = %e, "Server error");
            return Err(WebError::Server(e));
        }

        info!("Server shut down gracefully");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Builder for LaunchpadServer
pub struct LaunchpadServerBuilder {
    config: ServiceConfig,
}

impl LaunchpadServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
        }
    }

    /// Start from a fully loaded configuration
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<LaunchpadServer> {
        LaunchpadServer::new(self.config)
    }
}

impl Default for LaunchpadServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
