//! Crate-level error taxonomy.
//!
//! Component errors convert into [`Error`] with `?`. Callers branch on
//! [`Error::code`] and show [`Error::user_message`]; storage, configuration
//! and other unexpected failures share one generic message.

use crate::ai::SummarizeError;
use crate::config::ConfigError;
use crate::export::ExportError;
use crate::history::StoreError;
use crate::ingest::ParseError;
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Unknown artifact, or one owned by another identity
    #[error("note not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Error::Parse(ParseError::UnsupportedFormat(_)) => "UNSUPPORTED_FORMAT",
            Error::Parse(ParseError::EmptyDocument { .. }) => "EMPTY_DOCUMENT",
            Error::Parse(ParseError::UnreadableDocument { .. }) => "UNREADABLE_DOCUMENT",
            Error::Summarize(_) => "SUMMARIZATION_FAILED",
            Error::Export(ExportError::UnsupportedFormat(_)) => "UNSUPPORTED_EXPORT_FORMAT",
            Error::Export(ExportError::Render { .. }) => "EXPORT_FAILED",
            Error::Store(StoreError::ArtifactNotFound(_)) | Error::NotFound => "NOT_FOUND",
            Error::Store(_) | Error::Config(_) | Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show an end user
    pub fn user_message(&self) -> String {
        match self {
            Error::Parse(ParseError::UnsupportedFormat(_)) => {
                "File type not supported. Upload a PDF, Word document or text file.".to_string()
            }
            Error::Parse(ParseError::EmptyDocument { .. }) => {
                "The document appears to be empty or contains no readable text.".to_string()
            }
            Error::Parse(ParseError::UnreadableDocument { format, .. }) => {
                format!("The {} file could not be read. It may be damaged.", format)
            }
            Error::Summarize(_) => {
                "The AI service is unavailable or returned an unusable response. Please try again."
                    .to_string()
            }
            Error::Export(ExportError::UnsupportedFormat(format)) => {
                format!("Export format \"{}\" is not supported.", format)
            }
            Error::Export(ExportError::Render { format, .. }) => {
                format!("The note could not be exported as {}.", format)
            }
            Error::Store(StoreError::ArtifactNotFound(_)) | Error::NotFound => {
                "Note not found.".to_string()
            }
            Error::Store(_) | Error::Config(_) | Error::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}
