//! notesmith: turn uploaded documents into versioned, exportable summary notes.
//!
//! Pipeline: [`ingest`] normalizes PDF, Word or plain-text input, [`ai`]
//! summarizes it under a strict JSON contract, [`history`] keeps an
//! append-only version log of every artifact, and [`export`] renders an
//! artifact as PDF, DOCX, Markdown, HTML or JSON. [`NoteService`] wires the
//! stages together.

pub mod ai;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod service;
mod winansi;

pub use ai::{LlmSummarizer, OpenAiClient, SummarizeError, Summarizer, FALLBACK_TITLE};
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use export::{export, export_named, ExportError, ExportFormat, ExportRequest, ExportedFile};
pub use history::{
    ArtifactRepository, ArtifactVersion, FileRepository, MemoryRepository, StoreError,
    VersionHistory, VersionStore,
};
pub use ingest::{parse, parse_text, DocumentParser, ParseError};
pub use model::{ArtifactUpdate, NormalizedText, RawDocument, SourceFormat, Summary, SummaryArtifact};
pub use service::NoteService;
