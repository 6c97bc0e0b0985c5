use crate::model::SummaryArtifact;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Field order here is the key order in the output
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    title: &'a str,
    summary: &'a str,
    bullet_points: &'a [String],
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Pretty-printed with 2-space indentation
pub(super) fn render(artifact: &SummaryArtifact) -> Result<String, String> {
    let export = JsonExport {
        title: &artifact.title,
        summary: &artifact.summary,
        bullet_points: &artifact.bullet_points,
        created_at: artifact.created_at,
        updated_at: artifact.updated_at,
    };

    serde_json::to_string_pretty(&export).map_err(|e| format!("Failed to serialize: {}", e))
}
