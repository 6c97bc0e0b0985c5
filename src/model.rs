//! Shared data model for the ingestion → summarization → export pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// Input format a note was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Word,
    Plain,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded document, constructed once per request and discarded after parsing
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub declared_media_type: String,
    pub file_name: String,
}

impl RawDocument {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        declared_media_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            declared_media_type: declared_media_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Read a document from disk, guessing the media type from its extension.
    ///
    /// Unknown extensions are declared as `application/octet-stream`, which
    /// the parser rejects as unsupported.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self::new(bytes, media_type, file_name))
    }
}

/// Plain text extracted from a document. `text` is never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    text: String,
    source_format: SourceFormat,
    file_name: String,
}

impl NormalizedText {
    /// Only the parser builds these, after it has checked the text is non-empty.
    pub(crate) fn new(text: String, source_format: SourceFormat, file_name: String) -> Self {
        debug_assert!(!text.trim().is_empty());
        Self {
            text,
            source_format,
            file_name,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_format(&self) -> SourceFormat {
        self.source_format
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Output of the summarizer before it becomes a stored artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub summary: String,
    pub bullet_points: Vec<String>,
}

/// The durable note: title, prose summary and ordered bullet points.
///
/// `title` and `bullet_points` are never empty; [`ArtifactUpdate`] preserves that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryArtifact {
    pub id: Uuid,
    /// Opaque identity of the owner, supplied by the session layer
    pub owner_id: String,
    pub title: String,
    pub summary: String,
    pub bullet_points: Vec<String>,
    pub original_text: String,
    pub source_format: SourceFormat,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SummaryArtifact {
    pub fn new(owner_id: &str, title: String, summary: Summary, source: NormalizedText) -> Self {
        let now = Utc::now();
        let source_format = source.source_format();
        let file_name = source.file_name().to_string();

        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            title,
            summary: summary.summary,
            bullet_points: summary.bullet_points,
            original_text: source.into_text(),
            source_format,
            file_name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rendered body: bullet points joined by newlines
    pub fn content(&self) -> String {
        self.bullet_points.join("\n")
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

/// Fold runs of whitespace, line breaks included, into single spaces.
///
/// Titles and bullet points are single-line values.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Partial edit of an artifact.
///
/// Blank strings and empty lists mean "leave unchanged". Titles and bullet
/// points are folded onto one line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub bullet_points: Option<Vec<String>>,
}

impl ArtifactUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn bullet_points<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullet_points = Some(points.into_iter().map(Into::into).collect());
        self
    }

    /// Apply to `artifact`; returns whether anything changed.
    pub fn apply(&self, artifact: &mut SummaryArtifact) -> bool {
        let mut changed = false;

        if let Some(title) = self.title.as_deref().map(single_line).filter(|t| !t.is_empty()) {
            if artifact.title != title {
                artifact.title = title;
                changed = true;
            }
        }

        if let Some(summary) = self.summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if artifact.summary != summary {
                artifact.summary = summary.to_string();
                changed = true;
            }
        }

        if let Some(points) = &self.bullet_points {
            let points: Vec<String> = points
                .iter()
                .map(|p| single_line(p))
                .filter(|p| !p.is_empty())
                .collect();
            if !points.is_empty() && artifact.bullet_points != points {
                artifact.bullet_points = points;
                changed = true;
            }
        }

        if changed {
            artifact.updated_at = Utc::now();
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SummaryArtifact {
        let text = NormalizedText::new("Body".to_string(), SourceFormat::Plain, "a.txt".to_string());
        SummaryArtifact::new(
            "user-1",
            "Demo".to_string(),
            Summary {
                summary: "S".to_string(),
                bullet_points: vec!["Alpha".to_string(), "Beta".to_string()],
            },
            text,
        )
    }

    #[test]
    fn test_content_joins_bullets() {
        assert_eq!(sample().content(), "Alpha\nBeta");
    }

    #[test]
    fn test_update_ignores_blank_fields() {
        let mut artifact = sample();
        let update = ArtifactUpdate::default()
            .title("   ")
            .summary("")
            .bullet_points(Vec::<String>::new());

        assert!(!update.apply(&mut artifact));
        assert_eq!(artifact.title, "Demo");
        assert_eq!(artifact.bullet_points, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_update_replaces_fields() {
        let mut artifact = sample();
        let before = artifact.updated_at;
        let update = ArtifactUpdate::default()
            .title(" New ")
            .bullet_points(["One", " ", "Two"]);

        assert!(update.apply(&mut artifact));
        assert_eq!(artifact.title, "New");
        assert_eq!(artifact.bullet_points, vec!["One", "Two"]);
        assert!(artifact.updated_at >= before);
    }

    #[test]
    fn test_update_folds_multi_line_values() {
        let mut artifact = sample();
        let update = ArtifactUpdate::default()
            .title("Split\ntitle")
            .bullet_points(["first line\nsecond line", "  b  "]);

        assert!(update.apply(&mut artifact));
        assert_eq!(artifact.title, "Split title");
        assert_eq!(artifact.bullet_points, vec!["first line second line", "b"]);
        assert_eq!(artifact.content().lines().count(), 2);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("  a\r\n b\t\tc  "), "a b c");
        assert_eq!(single_line(" \n "), "");
    }

    #[test]
    fn test_word_count() {
        let text = NormalizedText::new(
            "one two\nthree".to_string(),
            SourceFormat::Plain,
            "t".to_string(),
        );
        assert_eq!(text.word_count(), 3);
    }
}
