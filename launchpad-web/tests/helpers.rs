//! Integration test helpers
//!
//! Every test gets its own server on an OS-assigned port, wired to fake GitHub
//! and Gemini upstreams and a fetcher that never touches the network.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Form, Json, Router,
};
use launchpad_analysis::{GeminiClient, MemoryAnalysisStore, RepositoryAnalyzer};
use launchpad_core::{ErrorContext, LaunchpadError, LaunchpadResult, ServiceConfig};
use launchpad_repo::{GitHubRepoUrl, RepositoryFetcher};
use launchpad_web::{create_app, oauth::GitHubOAuthClient, AppState};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "Iv1.testclient01";
pub const CLIENT_SECRET: &str = "test-client-secret-value";

// Keep test output quiet unless TEST_LOG is set
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// Serve `router` on 127.0.0.1 and return its base URL
pub async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// GitHub token endpoint whose behavior is chosen by the submitted code
pub async fn spawn_fake_github() -> String {
    async fn token(Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
        let code = form.get("code").cloned().unwrap_or_default();
        assert_eq!(form.get("client_id").map(String::as_str), Some(CLIENT_ID));
        assert_eq!(
            form.get("client_secret").map(String::as_str),
            Some(CLIENT_SECRET)
        );

        match code.as_str() {
            "good-code" => (
                StatusCode::OK,
                Json(json!({
                    "access_token": "gho_testtoken",
                    "token_type": "bearer",
                    "scope": "repo,user:email",
                    "client_secret": form.get("client_secret"),
                    "refresh_token": "ghr_should_not_leak"
                })),
            )
                .into_response(),
            "no-token-type" => {
                (StatusCode::OK, Json(json!({"access_token": "gho_other"}))).into_response()
            }
            "expired-code" => (
                StatusCode::OK,
                Json(json!({
                    "error": "bad_verification_code",
                    "error_description": "The code passed is incorrect or expired."
                })),
            )
                .into_response(),
            "unauthorized" => {
                (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"}))).into_response()
            }
            "html" => (StatusCode::OK, "<html>rate limited</html>").into_response(),
            "empty" => (StatusCode::OK, Json(json!({"scope": ""}))).into_response(),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))).into_response(),
        }
    }

    spawn_router(Router::new().route("/login/oauth/access_token", post(token))).await
}

/// Canned Gemini replies, served in order; the last one repeats
#[derive(Clone)]
pub struct FakeGemini {
    replies: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeGemini {
    pub fn answering(texts: &[&str]) -> Self {
        let replies = texts
            .iter()
            .map(|text| {
                (
                    StatusCode::OK,
                    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}),
                )
            })
            .collect();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from([(
                status,
                json!({"error": {"message": "quota exceeded"}}),
            )]))),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn spawn(&self) -> String {
        async fn generate(
            State(fake): State<FakeGemini>,
            Json(body): Json<Value>,
        ) -> impl IntoResponse {
            let prompt = body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            fake.prompts.lock().unwrap().push(prompt);

            let mut replies = fake.replies.lock().unwrap();
            let reply = if replies.len() > 1 {
                replies.pop_front().unwrap()
            } else {
                replies.front().cloned().unwrap()
            };
            (reply.0, Json(reply.1))
        }

        let router = Router::new()
            .route("/models/gemini-test:generateContent", post(generate))
            .with_state(self.clone());
        spawn_router(router).await
    }
}

/// Writes a tiny Node project instead of cloning
#[derive(Default)]
pub struct FakeFetcher {
    pub calls: AtomicUsize,
    pub fail: bool,
}

#[async_trait]
impl RepositoryFetcher for FakeFetcher {
    async fn fetch(&self, _repo: &GitHubRepoUrl, target: &Path) -> LaunchpadResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LaunchpadError::Git {
                message: "fatal: repository not found".to_string(),
                context: ErrorContext::new("fake_fetcher"),
            });
        }
        tokio::fs::create_dir_all(target.join("src")).await?;
        tokio::fs::write(
            target.join("package.json"),
            r#"{"name":"demo","scripts":{"start":"node src/index.js"}}"#,
        )
        .await?;
        tokio::fs::write(target.join("src").join("index.js"), "console.log('hi')").await?;
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub state: AppState,
    pub fetcher: Arc<FakeFetcher>,
    pub gemini: FakeGemini,
    pub scratch: tempfile::TempDir,
}

pub struct TestAppOptions {
    pub gemini: FakeGemini,
    pub gemini_key: Option<String>,
    pub clone_fails: bool,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            gemini: FakeGemini::answering(&[ANALYSIS_ANSWER]),
            gemini_key: Some("test-gemini-key".to_string()),
            clone_fails: false,
        }
    }
}

pub const ANALYSIS_ANSWER: &str = r#"Here is the analysis:
```json
{
  "stack": "Node.js",
  "framework": "Express",
  "buildCommand": "npm install",
  "startCommand": "npm start",
  "requiredEnv": ["PORT"],
  "recommendedEnvTemplate": "PORT=3000",
  "deploymentType": "web-service",
  "notes": "Listens on {PORT}"
}
```"#;

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(TestAppOptions::default()).await
    }

    pub async fn spawn_with(options: TestAppOptions) -> Self {
        LazyLock::force(&TRACING);

        let scratch = tempfile::tempdir().expect("Failed to create scratch dir");
        let github = spawn_fake_github().await;
        let gemini_base = options.gemini.spawn().await;

        let mut config = ServiceConfig::default();
        config.oauth.client_id = Some(CLIENT_ID.to_string());
        config.oauth.client_secret = Some(CLIENT_SECRET.to_string());
        config.oauth.token_url = format!("{}/login/oauth/access_token", github);
        config.gemini.api_key = options.gemini_key;
        config.gemini.model = "gemini-test".to_string();
        config.gemini.base_url = gemini_base;
        config.analysis.scratch_dir = scratch.path().to_path_buf();

        let fetcher = Arc::new(FakeFetcher {
            fail: options.clone_fails,
            ..Default::default()
        });
        let analyzer = RepositoryAnalyzer::new(
            fetcher.clone(),
            Arc::new(GeminiClient::new(config.gemini.clone())),
            Arc::new(MemoryAnalysisStore::new()),
            config.analysis.scratch_dir.clone(),
        );
        let state = AppState::with_components(
            config.clone(),
            GitHubOAuthClient::new(config.oauth.clone()),
            analyzer,
        );

        let address = spawn_router(create_app(state.clone())).await;

        Self {
            address,
            api_client: reqwest::Client::new(),
            state,
            fetcher,
            gemini: options.gemini,
            scratch,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn analyze(&self, repo_url: &str) -> reqwest::Response {
        self.post_json("/api/analyze-repo", &json!({ "repoUrl": repo_url }))
            .await
    }

    pub fn clone_count(&self) -> usize {
        self.fetcher.calls.load(Ordering::SeqCst)
    }

    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch.path())
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true)
    }
}
