//! Analysis prompt template

use launchpad_core::RepositoryMetadataBundle;

/// Keys the model must return, in prompt order
pub const ANALYSIS_KEYS: &[&str] = &[
    "stack",
    "framework",
    "buildCommand",
    "startCommand",
    "requiredEnv",
    "recommendedEnvTemplate",
    "deploymentType",
    "notes",
];

const MISSING: &str = "none";

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

fn other_manifests_section(bundle: &RepositoryMetadataBundle) -> String {
    if bundle.other_manifests.is_empty() {
        return format!("{}\n", MISSING);
    }
    bundle
        .other_manifests
        .iter()
        .map(|(name, content)| format!("--- {} ---\n{}\n", name, content))
        .collect()
}

/// Build the prompt for one repository. Missing files become the literal `none`.
pub fn build_analysis_prompt(repo_url: &str, bundle: &RepositoryMetadataBundle) -> String {
    let tree = if bundle.file_tree.is_empty() {
        MISSING
    } else {
        bundle.file_tree.as_str()
    };

    format!(
        r#"You are a deployment expert. Analyze the GitHub repository {repo_url} using the files below and determine how to build and deploy it.

package.json:
{package}

Dockerfile:
{dockerfile}

Environment file:
{env}

README:
{readme}

Other manifests:
{others}
File tree:
{tree}

Respond with JSON only, no markdown and no commentary, using exactly these keys: {keys}.
"requiredEnv" is an array of environment variable names; every other value is a string. "deploymentType" is one of "static", "web-service", "worker" or "container".
"#,
        package = or_none(bundle.package_manifest.as_deref()),
        dockerfile = or_none(bundle.containerfile.as_deref()),
        env = or_none(bundle.env_file_sample.as_deref()),
        readme = or_none(bundle.readme.as_deref()),
        others = other_manifests_section(bundle),
        keys = ANALYSIS_KEYS.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_missing_fields_become_none() {
        let prompt = build_analysis_prompt(
            "https://github.com/octo/demo",
            &RepositoryMetadataBundle::default(),
        );

        assert!(prompt.contains("https://github.com/octo/demo"));
        assert!(prompt.contains("package.json:\nnone\n"));
        assert!(prompt.contains("Dockerfile:\nnone\n"));
        assert!(prompt.contains("README:\nnone\n"));
        assert!(prompt.contains("Other manifests:\nnone\n"));
        assert!(prompt.contains("File tree:\nnone\n"));
    }

    #[test]
    fn test_embeds_content_and_keys() {
        let mut other = BTreeMap::new();
        other.insert("go_mod".to_string(), "module example.com/demo".to_string());
        let bundle = RepositoryMetadataBundle {
            package_manifest: Some("{\"name\":\"demo\"}".to_string()),
            file_tree: "└── main.go".to_string(),
            other_manifests: other,
            ..Default::default()
        };

        let prompt = build_analysis_prompt("https://github.com/octo/demo", &bundle);

        assert!(prompt.contains("{\"name\":\"demo\"}"));
        assert!(prompt.contains("--- go_mod ---\nmodule example.com/demo"));
        assert!(prompt.contains("└── main.go"));
        for key in ANALYSIS_KEYS {
            assert!(prompt.contains(key), "prompt is missing key {}", key);
        }
        assert!(prompt.contains("JSON only"));
    }
}
