//! Note pipeline orchestration: parse, summarize, persist, export.
//!
//! Every call carries the caller's opaque owner id. Artifacts owned by
//! someone else are reported as [`Error::NotFound`].

use crate::ai::{LlmSummarizer, OpenAiClient, Summarizer, FALLBACK_TITLE};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::{self, ExportFormat, ExportedFile};
use crate::history::{ArtifactRepository, FileRepository, VersionHistory, VersionStore};
use crate::ingest::{self, DocumentParser};
use crate::model::{single_line, ArtifactUpdate, NormalizedText, RawDocument, SummaryArtifact};
use std::sync::Arc;
use uuid::Uuid;

pub struct NoteService {
    summarizer: Arc<dyn Summarizer>,
    versions: Arc<VersionStore>,
    parser: DocumentParser,
}

impl NoteService {
    pub fn new(summarizer: Arc<dyn Summarizer>, repository: Arc<dyn ArtifactRepository>) -> Self {
        Self {
            summarizer,
            versions: Arc::new(VersionStore::new(repository)),
            parser: DocumentParser::new(),
        }
    }

    /// OpenAI-backed summarizer with file storage under `config.data_dir`
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = OpenAiClient::from_config(config)
            .map_err(|e| Error::Internal(format!("Failed to build completion client: {}", e)))?;
        let summarizer = LlmSummarizer::new(client, config.model.clone());
        let repository = FileRepository::open(&config.data_dir)?;

        tracing::info!(
            model = %config.model,
            data_dir = %config.data_dir.display(),
            "[NoteService] Initialized"
        );

        Ok(Self::new(Arc::new(summarizer), Arc::new(repository)))
    }

    /// Parse an upload, summarize it and store the result as version 1.
    ///
    /// Nothing is written unless parsing and summarization both succeed.
    pub async fn ingest(&self, owner_id: &str, raw: RawDocument) -> Result<SummaryArtifact> {
        let parser = self.parser;
        let normalized = tokio::task::spawn_blocking(move || parser.parse(&raw))
            .await
            .map_err(|e| Error::Internal(format!("Parser task failed: {}", e)))??;

        self.summarize_and_store(owner_id, None, normalized).await
    }

    /// Create a note from typed text. A blank or placeholder title is generated.
    pub async fn create_from_text(
        &self,
        owner_id: &str,
        title: Option<&str>,
        text: &str,
    ) -> Result<SummaryArtifact> {
        let normalized = ingest::parse_text(text, None)?;
        let title = title
            .map(single_line)
            .filter(|t| !t.is_empty() && t != FALLBACK_TITLE);

        self.summarize_and_store(owner_id, title, normalized).await
    }

    async fn summarize_and_store(
        &self,
        owner_id: &str,
        title: Option<String>,
        normalized: NormalizedText,
    ) -> Result<SummaryArtifact> {
        let summary = self.summarizer.summarize(normalized.text()).await?;

        let title = match title {
            Some(title) => title,
            None => self.summarizer.generate_title(normalized.text()).await,
        };

        let artifact = SummaryArtifact::new(owner_id, title, summary, normalized);

        // Locking and file writes stay off the async workers
        let versions = Arc::clone(&self.versions);
        let artifact = tokio::task::spawn_blocking(move || {
            versions.commit_create(&artifact).map(|()| artifact)
        })
        .await
        .map_err(|e| Error::Internal(format!("Store task failed: {}", e)))??;

        tracing::info!(
            artifact_id = %artifact.id,
            bullet_points = artifact.bullet_points.len(),
            "[NoteService] Created note"
        );

        Ok(artifact)
    }

    pub fn get(&self, owner_id: &str, id: Uuid) -> Result<SummaryArtifact> {
        match self.versions.current(id)? {
            Some(artifact) if artifact.is_owned_by(owner_id) => Ok(artifact),
            Some(_) => {
                tracing::warn!(artifact_id = %id, "[NoteService] Owner mismatch");
                Err(Error::NotFound)
            }
            None => Err(Error::NotFound),
        }
    }

    /// Apply an edit, snapshotting the pre-edit state first
    pub fn update(&self, owner_id: &str, id: Uuid, update: ArtifactUpdate) -> Result<SummaryArtifact> {
        self.get(owner_id, id)?;

        let updated = self.versions.commit_edit(id, |artifact| {
            if !update.apply(artifact) {
                tracing::debug!(artifact_id = %id, "[NoteService] Update changed nothing");
            }
        })?;

        Ok(updated)
    }

    pub fn versions(&self, owner_id: &str, id: Uuid) -> Result<VersionHistory> {
        self.get(owner_id, id)?;
        Ok(self.versions.list_versions(id)?)
    }

    /// Render the current artifact. Never touches stored state.
    pub fn export(&self, owner_id: &str, id: Uuid, format: ExportFormat) -> Result<ExportedFile> {
        let artifact = self.get(owner_id, id)?;
        Ok(export::export(&artifact, format)?)
    }

    pub fn export_named(&self, owner_id: &str, id: Uuid, format: &str) -> Result<ExportedFile> {
        let format = format.parse::<ExportFormat>()?;
        self.export(owner_id, id, format)
    }

    pub async fn improve_text(&self, text: &str) -> Result<String> {
        Ok(self.summarizer.improve_text(text).await?)
    }
}
