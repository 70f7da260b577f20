//! GitHub OAuth authorization-code exchange
//!
//! The browser only ever sees the access token; the client secret stays in
//! this process and is never logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use launchpad_core::{OAuthConfig, TokenResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

/// OAuth failure as returned to the browser
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}: {error_description}")]
pub struct OAuthError {
    pub status: StatusCode,
    pub error: String,
    pub error_description: String,
}

/// Wire shape of [`OAuthError`]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OAuthErrorBody {
    #[schema(example = "bad_verification_code")]
    pub error: String,
    #[schema(example = "The code passed is incorrect or expired.")]
    pub error_description: String,
}

impl OAuthError {
    fn new(status: StatusCode, error: &str, description: impl Into<String>) -> Self {
        Self {
            status,
            error: error.to_string(),
            error_description: description.into(),
        }
    }

    pub fn missing_code(description: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Missing authorization code", description)
    }

    pub fn invalid_response_format() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "invalid_response_format",
            "Invalid response format from GitHub",
        )
    }

    pub fn missing_access_token() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "invalid_response",
            "GitHub did not return an access token",
        )
    }

    pub fn unreachable(description: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "upstream_unreachable", description)
    }

    pub fn misconfigured() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "server_misconfigured",
            "GitHub OAuth credentials are not configured",
        )
    }

    /// Echo an upstream error. 2xx bodies carrying an `error` become 400.
    fn upstream(status: StatusCode, body: &GitHubTokenResponse) -> Self {
        let status = if status.is_success() {
            StatusCode::BAD_REQUEST
        } else {
            status
        };
        let description = body
            .error_description
            .clone()
            .or_else(|| body.error.clone())
            .unwrap_or_else(|| "Unknown error".to_string());

        Self {
            status,
            error: body
                .error
                .clone()
                .unwrap_or_else(|| "token_exchange_failed".to_string()),
            error_description: description,
        }
    }
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        let body = OAuthErrorBody {
            error: self.error,
            error_description: self.error_description,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Token endpoint answer. GitHub reports errors with a 200 status, so every
/// field is optional.
#[derive(Debug, Default, Deserialize)]
struct GitHubTokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Client for GitHub's OAuth web flow
#[derive(Clone)]
pub struct GitHubOAuthClient {
    client: reqwest::Client,
    config: OAuthConfig,
}

impl GitHubOAuthClient {
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: OAuthConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Browser redirect URL for the consent screen
    pub fn authorize_url(&self, state: &str) -> Result<String, OAuthError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(OAuthError::misconfigured)?;

        let mut url = url::Url::parse(&self.config.authorize_url).map_err(|e| {
            error!(error = %e, "Invalid GitHub authorize URL in configuration");
            OAuthError::misconfigured()
        })?;
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope)
            .append_pair("state", state);

        Ok(url.to_string())
    }

    /// Trade an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResult, OAuthError> {
        let (client_id, client_secret) = match (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
        ) {
            (Some(id), Some(secret)) => (id, secret),
            _ => return Err(OAuthError::misconfigured()),
        };

        info!(
            code_length = code.len(),
            redirect_uri = %self.config.redirect_uri,
            "Starting GitHub token exchange"
        );

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "GitHub token endpoint unreachable");
                OAuthError::unreachable(format!("Could not reach GitHub: {}", e))
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "GitHub token exchange response");

        let text = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read GitHub response body");
            OAuthError::invalid_response_format()
        })?;
        let body: GitHubTokenResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, status = status.as_u16(), "Failed to parse GitHub response");
            OAuthError::invalid_response_format()
        })?;

        debug!(
            has_access_token = body.access_token.is_some(),
            has_error = body.error.is_some(),
            "Parsed GitHub response"
        );

        if !status.is_success() || body.error.is_some() {
            let failure = OAuthError::upstream(status, &body);
            warn!(
                upstream_status = status.as_u16(),
                error = %failure.error,
                error_description = %failure.error_description,
                "GitHub OAuth error"
            );
            return Err(failure);
        }

        let GitHubTokenResponse {
            access_token,
            token_type,
            scope,
            ..
        } = body;

        let access_token = match access_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                error!("No access token in GitHub response");
                return Err(OAuthError::missing_access_token());
            }
        };

        info!("Token exchange successful");
        Ok(TokenResult {
            access_token,
            token_type: token_type.unwrap_or_else(|| "bearer".to_string()),
            scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuthConfig {
        OAuthConfig {
            client_id: Some("Iv1.client".to_string()),
            client_secret: Some("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_upstream_status_rule() {
        let body = GitHubTokenResponse {
            error: Some("bad_verification_code".to_string()),
            ..Default::default()
        };
        let err = OAuthError::upstream(StatusCode::OK, &body);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "bad_verification_code");
        assert_eq!(err.error_description, "bad_verification_code");

        let err = OAuthError::upstream(StatusCode::UNAUTHORIZED, &GitHubTokenResponse::default());
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error, "token_exchange_failed");
        assert_eq!(err.error_description, "Unknown error");
    }

    #[test]
    fn test_authorize_url() {
        let client = GitHubOAuthClient::new(config());
        let url = client.authorize_url("abc123").unwrap();
        let parsed = url::Url::parse(&url).unwrap();

        assert_eq!(parsed.host_str(), Some("github.com"));
        let pairs: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "Iv1.client");
        assert_eq!(pairs["state"], "abc123");
        assert_eq!(pairs["scope"], "read:user user:email repo");
        assert!(!url.contains("secret"));
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let client = GitHubOAuthClient::new(OAuthConfig::default());
        assert_eq!(
            client.exchange_code("code").await.unwrap_err(),
            OAuthError::misconfigured()
        );
        assert!(client.authorize_url("s").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let client = GitHubOAuthClient::new(OAuthConfig {
            token_url: "http://127.0.0.1:9/login/oauth/access_token".to_string(),
            ..config()
        });

        let err = client.exchange_code("code").await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error, "upstream_unreachable");
    }
}
