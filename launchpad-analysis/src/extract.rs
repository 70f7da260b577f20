//! JSON extraction from free-form model output
//!
//! Models wrap JSON in prose or code fences. The first `{` is matched to its
//! balancing `}`; braces inside JSON string literals do not count.

use launchpad_core::{AnalysisPayload, ErrorContext, LaunchpadError, LaunchpadResult};

/// Return the first balanced `{...}` substring of `text`, if any
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse the model's answer into an [`AnalysisPayload`]
///
/// Only two outcomes fail: no `{...}` in the text, or a substring that is not valid JSON.
pub fn parse_analysis(text: &str) -> LaunchpadResult<AnalysisPayload> {
    let json = extract_json_object(text).ok_or_else(|| LaunchpadError::Parse {
        message: "No JSON object found in AI response".to_string(),
        context: ErrorContext::new("analysis_parser").with_operation("extract_json"),
    })?;

    serde_json::from_str(json).map_err(|e| LaunchpadError::Parse {
        message: format!("AI response contained invalid JSON: {}", e),
        context: ErrorContext::new("analysis_parser").with_operation("deserialize"),
    })
}
