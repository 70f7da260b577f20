//! Gemini text generation client

use async_trait::async_trait;
use launchpad_core::{config_error, ErrorContext, GeminiConfig, LaunchpadError, LaunchpadResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info};

const PROVIDER: &str = "gemini";

/// Single-prompt text generation
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send one user prompt and return the model's raw text answer
    async fn generate(&self, prompt: &str) -> LaunchpadResult<String>;

    /// Whether credentials are present; reported by the health check
    fn is_configured(&self) -> bool;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Google Gemini client speaking the `generateContent` REST endpoint
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        info!(model = %config.model, configured = config.is_configured(), "Created Gemini client");
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn llm_error(&self, message: String, status: Option<u16>, operation: &str) -> LaunchpadError {
        LaunchpadError::Llm {
            message,
            provider: Some(PROVIDER.to_string()),
            status,
            context: ErrorContext::new("gemini_client")
                .with_operation(operation)
                .with_metadata("model", &self.config.model),
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> LaunchpadResult<String> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(config_error!("Gemini API key not configured", "gemini_client")),
        };

        let start_time = Instant::now();
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(endpoint = %self.endpoint(), prompt_chars = prompt.len(), "Sending Gemini request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.llm_error(format!("Gemini request failed: {}", e), None, "send"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Gemini API error");
            return Err(self.llm_error(
                format!("Gemini API error: {} {}", status.as_u16(), body.trim()),
                Some(status.as_u16()),
                "send",
            ));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            self.llm_error(format!("Invalid Gemini response: {}", e), None, "decode")
        })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(self.llm_error(
                "Gemini returned no text content".to_string(),
                None,
                "decode",
            ));
        }

        info!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            chars = text.len(),
            "Generated Gemini response"
        );
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(base_url: String, api_key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.map(str::to_string),
            model: "gemini-test".to_string(),
            base_url,
        }
    }

    #[tokio::test]
    async fn test_generate_joins_parts() {
        let router = Router::new().route(
            "/models/gemini-test:generateContent",
            post(|headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-goog-api-key"], "test-key");
                assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
                Json(json!({
                    "candidates": [{
                        "content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}
                    }]
                }))
            }),
        );
        let base = spawn_upstream(router).await;
        let client = GeminiClient::new(config(base, Some("test-key")));

        assert!(client.is_configured());
        assert_eq!(client.generate("hello").await.unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_upstream_status_is_kept() {
        let router = Router::new().route(
            "/models/gemini-test:generateContent",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
        );
        let base = spawn_upstream(router).await;
        let client = GeminiClient::new(config(base, Some("k")));

        match client.generate("hi").await {
            Err(LaunchpadError::Llm { status, .. }) => assert_eq!(status, Some(429)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_candidates_is_error() {
        let router = Router::new().route(
            "/models/gemini-test:generateContent",
            post(|| async { Json(json!({"candidates": []})) }),
        );
        let base = spawn_upstream(router).await;
        let client = GeminiClient::new(config(base, Some("k")));

        assert!(matches!(
            client.generate("hi").await,
            Err(LaunchpadError::Llm { status: None, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = GeminiClient::new(config("http://127.0.0.1:9".to_string(), None));

        assert!(!client.is_configured());
        assert!(matches!(
            client.generate("hi").await,
            Err(LaunchpadError::Config { .. })
        ));
    }
}
