//! Service configuration
//!
//! Built from defaults, an optional TOML file and environment variables, in
//! that order.

use crate::error::{ErrorContext, LaunchpadError, LaunchpadResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/auth/github/callback";
pub const DEFAULT_PORT: u16 = 3001;
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub oauth: OAuthConfig,
    pub gemini: GeminiConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS (the frontend dev server)
    pub frontend_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            frontend_origin: "http://localhost:8080".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// GitHub OAuth application credentials
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub token_url: String,
    pub authorize_url: String,
    pub scope: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            token_url: GITHUB_TOKEN_URL.to_string(),
            authorize_url: GITHUB_AUTHORIZE_URL.to_string(),
            scope: "read:user user:email repo".to_string(),
        }
    }
}

// Hand-written so the secret can never end up in a log line via `{:?}`.
impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id_hint())
            .field("client_secret_set", &self.client_secret.is_some())
            .field("redirect_uri", &self.redirect_uri)
            .field("token_url", &self.token_url)
            .finish()
    }
}

impl OAuthConfig {
    /// First eight characters of the client id followed by `...`
    pub fn client_id_hint(&self) -> String {
        match &self.client_id {
            Some(id) => format!("{}...", id.chars().take(8).collect::<String>()),
            None => "Missing".to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key_set", &self.is_configured())
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Parent directory for per-request scratch clones
    pub scratch_dir: PathBuf,
    pub clone_depth: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join("launchpad"),
            clone_depth: 1,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> LaunchpadResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LaunchpadError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        toml::from_str(&content).map_err(|e| LaunchpadError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })
    }

    /// Overlay values found through `lookup`; empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = get("VITE_GITHUB_CLIENT_ID").or_else(|| get("GITHUB_CLIENT_ID")) {
            self.oauth.client_id = Some(id);
        }
        if let Some(secret) =
            get("VITE_GITHUB_CLIENT_SECRET").or_else(|| get("GITHUB_CLIENT_SECRET"))
        {
            self.oauth.client_secret = Some(secret);
        }
        if let Some(uri) = get("VITE_GITHUB_REDIRECT_URI") {
            self.oauth.redirect_uri = uri;
        }
        if let Some(host) = get("BACKEND_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("BACKEND_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(origin) = get("FRONTEND_ORIGIN") {
            self.server.frontend_origin = origin;
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base_url) = get("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Some(dir) = get("LAUNCHPAD_SCRATCH_DIR") {
            self.analysis.scratch_dir = PathBuf::from(dir);
        }
    }

    /// Names of the mandatory settings that are missing
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.oauth.client_id.is_none() {
            missing.push("VITE_GITHUB_CLIENT_ID");
        }
        if self.oauth.client_secret.is_none() {
            missing.push("VITE_GITHUB_CLIENT_SECRET");
        }
        missing
    }

    /// Validate configuration
    pub fn validate(&self) -> LaunchpadResult<()> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(LaunchpadError::Config {
                message: format!("Missing required environment variables: {}", missing.join(", ")),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Add them to your .env file and restart the server"),
            });
        }

        if self.analysis.clone_depth == 0 {
            return Err(LaunchpadError::Config {
                message: "analysis.clone_depth must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config").with_operation("validate"),
            });
        }

        Ok(())
    }
}
