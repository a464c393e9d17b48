use serde::{Deserialize, Deserializer};

use crate::Summary;

/// Remove a surrounding markdown code fence
///
/// Only the outer markers are touched: a leading "```json" or "```" and a
/// trailing "```". Content without fences is returned trimmed.
pub fn strip_code_fence(content: &str) -> &str {
    let mut cleaned = content.trim();

    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }

    cleaned.trim()
}

#[derive(Deserialize)]
struct RawSummary {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    key_points: Vec<String>,
}

/// Models sometimes answer `"key_points": null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse model output into a [`Summary`]
///
/// Never fails. Output that is not the expected JSON object becomes the
/// summary text as-is, with no key points.
pub fn parse_summary(content: &str) -> Summary {
    match serde_json::from_str::<RawSummary>(strip_code_fence(content)) {
        Ok(raw) => Summary {
            summary: raw.summary,
            key_points: raw.key_points,
        },
        Err(e) => {
            tracing::debug!("summary content is not JSON, using raw text: {e}");

            Summary {
                summary: Some(content.to_string()),
                key_points: Vec::new(),
            }
        }
    }
}
