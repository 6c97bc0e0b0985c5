//! Exporter
//!
//! Renders a [`SummaryArtifact`] into one of five download formats. Each
//! renderer is a pure function of the artifact and embeds no timestamps of
//! its own.

mod docx;
mod html;
mod json;
mod markdown;
mod pdf;

use crate::model::SummaryArtifact;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest file name handed to the download layer, extension included
const MAX_FILE_NAME_LENGTH: usize = 255;

/// Used when the title sanitizes to nothing
const FALLBACK_FILE_STEM: &str = "note";

static UNSAFE_FILE_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9._-]").expect("Invalid regex"));

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to render {format}: {reason}")]
    Render { format: ExportFormat, reason: String },
}

/// Closed set of export targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Markdown,
    Html,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Pdf,
        ExportFormat::Docx,
        ExportFormat::Markdown,
        ExportFormat::Html,
        ExportFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" | "word" => Ok(ExportFormat::Docx),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// A rendered download
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub file_name: String,
}

impl ExportedFile {
    /// Value for the `Content-Disposition` header
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

/// Artifact plus target format
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub artifact: &'a SummaryArtifact,
    pub target_format: ExportFormat,
}

impl ExportRequest<'_> {
    pub fn render(&self) -> Result<ExportedFile, ExportError> {
        export(self.artifact, self.target_format)
    }
}

/// Render `artifact` in `format`
pub fn export(artifact: &SummaryArtifact, format: ExportFormat) -> Result<ExportedFile, ExportError> {
    let bytes = match format {
        ExportFormat::Pdf => pdf::render(artifact),
        ExportFormat::Docx => docx::render(artifact),
        ExportFormat::Markdown => Ok(markdown::render(artifact).into_bytes()),
        ExportFormat::Html => Ok(html::render(artifact).into_bytes()),
        ExportFormat::Json => json::render(artifact).map(String::into_bytes),
    }
    .map_err(|reason| {
        tracing::error!("[Exporter] {} export of {} failed: {}", format, artifact.id, reason);
        ExportError::Render { format, reason }
    })?;

    tracing::info!(
        artifact_id = %artifact.id,
        format = %format,
        bytes = bytes.len(),
        "[Exporter] Rendered export"
    );

    Ok(ExportedFile {
        bytes,
        mime_type: format.mime_type(),
        file_name: file_name_for(&artifact.title, format),
    })
}

/// Render with a caller-supplied format string such as `"md"` or `"word"`
pub fn export_named(artifact: &SummaryArtifact, format: &str) -> Result<ExportedFile, ExportError> {
    let format = format.parse::<ExportFormat>().map_err(|e| {
        tracing::warn!("[Exporter] Rejected export format {:?}", format);
        e
    })?;
    export(artifact, format)
}

/// Replace anything outside `[A-Za-z0-9._-]` with `_`
pub fn sanitize_file_name(name: &str) -> String {
    UNSAFE_FILE_NAME_CHARS.replace_all(name, "_").into_owned()
}

fn file_name_for(title: &str, format: ExportFormat) -> String {
    let extension = format.extension();
    let mut stem = sanitize_file_name(title.trim());
    if stem.is_empty() {
        stem = FALLBACK_FILE_STEM.to_string();
    }

    // Sanitized names are ASCII, so byte truncation is safe
    let max_stem = MAX_FILE_NAME_LENGTH - extension.len() - 1;
    stem.truncate(max_stem);

    format!("{}.{}", stem, extension)
}
