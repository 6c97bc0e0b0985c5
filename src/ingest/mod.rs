//! Document Parser Module
//!
//! Pure Rust text extraction: every supported upload is reduced to one
//! [`NormalizedText`] before summarization.
//!
//! ## Supported Formats
//! - PDF: text layer via pdf-extract (no OCR, scanned PDFs come out empty)
//! - Word: .docx via docx-rs, legacy .doc via the OLE2 piece table
//! - Text: any `text/*` media type, decoded as UTF-8
//!
//! Extraction is all-or-nothing per document.

mod legacy_doc;
mod pdf;
mod word;

use crate::model::{NormalizedText, RawDocument, SourceFormat};
use thiserror::Error;

/// Maximum text length kept from PDF/Word extraction (to avoid memory issues with huge docs)
const MAX_TEXT_LENGTH: usize = 500_000; // ~500KB of text

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Parser failures. Each kind maps to distinct user guidance.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("{format} document contains no extractable text")]
    EmptyDocument { format: SourceFormat },
    #[error("failed to read {format} document: {reason}")]
    UnreadableDocument {
        format: SourceFormat,
        reason: String,
    },
}

/// Extraction route chosen from the declared media type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pdf,
    /// Legacy binary or XML-based Word container
    Word,
    PlainText,
}

impl MediaKind {
    /// Classify a declared media type. Case and parameters are ignored.
    pub fn detect(declared_media_type: &str) -> Option<Self> {
        let essence = declared_media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MIME_PDF => Some(Self::Pdf),
            MIME_DOC | MIME_DOCX => Some(Self::Word),
            e if e.starts_with("text/") => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn source_format(&self) -> SourceFormat {
        match self {
            Self::Pdf => SourceFormat::Pdf,
            Self::Word => SourceFormat::Word,
            Self::PlainText => SourceFormat::Plain,
        }
    }
}

/// Stateless document parser
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an uploaded document into normalized text
    pub fn parse(&self, raw: &RawDocument) -> Result<NormalizedText, ParseError> {
        parse(&raw.bytes, &raw.declared_media_type, &raw.file_name)
    }

    /// Check whether a declared media type has an extraction route
    pub fn is_supported(declared_media_type: &str) -> bool {
        MediaKind::detect(declared_media_type).is_some()
    }
}

/// Parse raw bytes according to the declared media type
pub fn parse(
    bytes: &[u8],
    declared_media_type: &str,
    file_name: &str,
) -> Result<NormalizedText, ParseError> {
    let kind = MediaKind::detect(declared_media_type).ok_or_else(|| {
        tracing::warn!(
            "[DocumentParser] Rejected {} with media type {:?}",
            file_name,
            declared_media_type
        );
        ParseError::UnsupportedFormat(declared_media_type.to_string())
    })?;
    let format = kind.source_format();

    tracing::debug!(
        "[DocumentParser] Parsing {} ({} bytes) as {}",
        file_name,
        bytes.len(),
        format
    );

    let text = match kind {
        MediaKind::PlainText => read_plain_text(bytes, declared_media_type)?,
        MediaKind::Pdf => {
            let raw = pdf::extract(bytes).map_err(|reason| ParseError::UnreadableDocument {
                format,
                reason,
            })?;
            finish_extraction(&raw, format, file_name)
        }
        MediaKind::Word => {
            let raw = word::extract(bytes).map_err(|reason| ParseError::UnreadableDocument {
                format,
                reason,
            })?;
            finish_extraction(&raw, format, file_name)
        }
    };

    if text.is_empty() {
        tracing::warn!("[DocumentParser] No text in {} ({})", file_name, format);
        return Err(ParseError::EmptyDocument { format });
    }

    tracing::info!(
        "[DocumentParser] Extracted {} chars, {} words from {}",
        text.len(),
        text.split_whitespace().count(),
        file_name
    );

    Ok(NormalizedText::new(text, format, file_name.to_string()))
}

/// Parse text typed or pasted by the user (no file behind it)
pub fn parse_text(text: &str, file_name: Option<&str>) -> Result<NormalizedText, ParseError> {
    parse(text.as_bytes(), "text/plain", file_name.unwrap_or("text-input"))
}

/// Decode plain text; only trimming is applied
fn read_plain_text(bytes: &[u8], declared_media_type: &str) -> Result<String, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        tracing::warn!("[DocumentParser] Invalid UTF-8 at byte {}", e.valid_up_to());
        ParseError::UnsupportedFormat(format!("{} (invalid UTF-8)", declared_media_type))
    })?;

    Ok(text.trim().to_string())
}

fn finish_extraction(raw: &str, format: SourceFormat, file_name: &str) -> String {
    let raw_len = raw.len();
    let text = clean_text(raw);
    let text = truncate_text(&text);

    tracing::debug!(
        "[DocumentParser] {} raw extraction: {} chars -> {} chars after cleaning from {}",
        format,
        raw_len,
        text.len(),
        file_name
    );

    text
}

/// Clean extracted text
fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate text to max length, preserving word boundaries
fn truncate_text(text: &str) -> String {
    if text.len() <= MAX_TEXT_LENGTH {
        return text.to_string();
    }

    let mut cut = MAX_TEXT_LENGTH;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let truncated = &text[..cut];

    // Try to break at paragraph
    if let Some(pos) = truncated.rfind('\n') {
        return truncated[..pos].to_string();
    }

    // Try to break at sentence
    if let Some(pos) = truncated.rfind(". ") {
        return truncated[..=pos].to_string();
    }

    // Fall back to word boundary
    if let Some(pos) = truncated.rfind(' ') {
        return truncated[..pos].to_string();
    }

    truncated.to_string()
}
