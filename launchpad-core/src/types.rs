//! Core data type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Access token returned to the browser after a successful code exchange.
///
/// Deliberately has no room for the client secret or any other upstream field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResult {
    pub access_token: String,
    pub token_type: String,
    pub scope: Option<String>,
}

/// Well-known files and a bounded directory tree read from a repository snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadataBundle {
    pub package_manifest: Option<String>,
    pub containerfile: Option<String>,
    pub env_file_sample: Option<String>,
    pub readme: Option<String>,
    pub file_tree: String,
    /// Keyed by sanitized filename, e.g. `requirements_txt`
    pub other_manifests: BTreeMap<String, String>,
}

/// Deployment analysis as produced by the model, before it is stamped.
///
/// Kept as the JSON object the model returned. The prompt asks for `stack`,
/// `framework`, `buildCommand`, `startCommand`, `requiredEnv`,
/// `recommendedEnvTemplate`, `deploymentType` and `notes`, but any value
/// (including `null`) and any extra key is carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisPayload(pub Map<String, Value>);

impl AnalysisPayload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, `None` when absent or not a string
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for AnalysisPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Keys stamped by the server on every record
const STAMPED_KEYS: &[&str] = &["repoUrl", "analyzedAt"];

/// Stored result of one successful repository analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    #[serde(flatten)]
    pub analysis: AnalysisPayload,
    pub repo_url: String,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Stamp `analysis`; model-supplied `repoUrl`/`analyzedAt` keys are replaced
    pub fn new(mut analysis: AnalysisPayload, repo_url: impl Into<String>) -> Self {
        for key in STAMPED_KEYS {
            analysis.0.remove(*key);
        }
        Self {
            analysis,
            repo_url: repo_url.into(),
            analyzed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> AnalysisPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_record_serializes_flat_camel_case() {
        let record = AnalysisRecord::new(
            payload(json!({
                "stack": "Node.js",
                "buildCommand": "npm install",
                "requiredEnv": ["PORT"]
            })),
            "https://github.com/octo/demo",
        );
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["stack"], "Node.js");
        assert_eq!(value["buildCommand"], "npm install");
        assert_eq!(value["requiredEnv"], json!(["PORT"]));
        assert_eq!(value["repoUrl"], "https://github.com/octo/demo");
        assert!(value["analyzedAt"].is_string());
        assert!(value.get("analysis").is_none());
    }

    #[test]
    fn test_payload_keeps_nulls_and_extra_keys() {
        let analysis = payload(json!({
            "stack": "Static HTML",
            "framework": null,
            "port": 8080
        }));
        assert_eq!(analysis.str_field("stack"), Some("Static HTML"));
        assert_eq!(analysis.str_field("framework"), None);

        let record = AnalysisRecord::new(analysis, "https://github.com/octo/site");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["framework"], Value::Null);
        assert_eq!(value["port"], 8080);

        let back: AnalysisRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_model_cannot_override_stamped_keys() {
        let record = AnalysisRecord::new(
            payload(json!({"stack": "Go", "repoUrl": "https://evil.example", "analyzedAt": "never"})),
            "https://github.com/octo/demo",
        );
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["repoUrl"], "https://github.com/octo/demo");
        assert!(chrono::DateTime::parse_from_rfc3339(value["analyzedAt"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_token_result_shape() {
        let token = TokenResult {
            access_token: "abc".to_string(),
            token_type: "bearer".to_string(),
            scope: Some("repo".to_string()),
        };
        let value = serde_json::to_value(&token).unwrap();
        assert_eq!(value, json!({"access_token": "abc", "token_type": "bearer", "scope": "repo"}));
    }
}
