//! Persistence seam for artifacts and their version rows.

use super::entry::ArtifactVersion;
use crate::model::SummaryArtifact;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored record could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
    #[error("version {0} already recorded")]
    DuplicateVersion(Uuid),
    #[error("artifact {0} not found")]
    ArtifactNotFound(Uuid),
}

/// The three operations the pipeline needs from durable storage, plus a
/// version read-back.
pub trait ArtifactRepository: Send + Sync {
    /// Read the current artifact
    fn load(&self, id: Uuid) -> Result<Option<SummaryArtifact>, StoreError>;

    /// Write the current artifact, replacing any previous state
    fn save(&self, artifact: &SummaryArtifact) -> Result<(), StoreError>;

    /// Append one version row. Rows are never updated or removed.
    fn append_version(&self, version: &ArtifactVersion) -> Result<(), StoreError>;

    /// All version rows for an artifact in append order
    fn versions(&self, artifact_id: Uuid) -> Result<Vec<ArtifactVersion>, StoreError>;
}

/// Process-local repository
#[derive(Default)]
pub struct MemoryRepository {
    artifacts: RwLock<HashMap<Uuid, SummaryArtifact>>,
    versions: RwLock<HashMap<Uuid, Vec<ArtifactVersion>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactRepository for MemoryRepository {
    fn load(&self, id: Uuid) -> Result<Option<SummaryArtifact>, StoreError> {
        let artifacts = self.artifacts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(artifacts.get(&id).cloned())
    }

    fn save(&self, artifact: &SummaryArtifact) -> Result<(), StoreError> {
        let mut artifacts = self.artifacts.write().map_err(|_| StoreError::Poisoned)?;
        artifacts.insert(artifact.id, artifact.clone());
        Ok(())
    }

    fn append_version(&self, version: &ArtifactVersion) -> Result<(), StoreError> {
        let mut versions = self.versions.write().map_err(|_| StoreError::Poisoned)?;
        let rows = versions.entry(version.artifact_id).or_default();
        if rows.iter().any(|v| v.version_id == version.version_id) {
            return Err(StoreError::DuplicateVersion(version.version_id));
        }
        rows.push(version.clone());
        Ok(())
    }

    fn versions(&self, artifact_id: Uuid) -> Result<Vec<ArtifactVersion>, StoreError> {
        let versions = self.versions.read().map_err(|_| StoreError::Poisoned)?;
        Ok(versions.get(&artifact_id).cloned().unwrap_or_default())
    }
}
