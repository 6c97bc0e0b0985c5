//! Append-only version log over a mutable current artifact.
//!
//! Every mutation goes through [`VersionStore::commit_edit`], which records a
//! snapshot of the pre-edit state before the new state is written. Both
//! writes happen under a per-artifact lock. A lock entry lives only while a
//! commit holds it, so the lock table stays bounded by concurrent commits.

use super::entry::{ArtifactVersion, VersionHistory};
use super::repository::{ArtifactRepository, StoreError};
use crate::model::SummaryArtifact;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct VersionStore {
    repository: Arc<dyn ArtifactRepository>,
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl VersionStore {
    pub fn new(repository: Arc<dyn ArtifactRepository>) -> Self {
        Self {
            repository,
            locks: DashMap::new(),
        }
    }

    /// Run `commit` under the artifact's lock, then drop the entry if no one
    /// else is waiting on it
    fn with_lock<T>(
        &self,
        id: Uuid,
        commit: impl FnOnce() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let lock = self.locks.entry(id).or_default().clone();
        let result = match lock.lock() {
            Ok(_guard) => commit(),
            Err(_) => Err(StoreError::Poisoned),
        };
        drop(lock);

        self.locks.remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Append a snapshot of `artifact` as it is right now
    pub fn snapshot(&self, artifact: &SummaryArtifact) -> Result<ArtifactVersion, StoreError> {
        let version = ArtifactVersion::capture(artifact);
        self.repository.append_version(&version)?;

        tracing::info!(
            artifact_id = %artifact.id,
            version_id = %version.version_id,
            "[VersionStore] Recorded version"
        );

        Ok(version)
    }

    /// Versions of an artifact, oldest first
    pub fn list_versions(&self, artifact_id: Uuid) -> Result<VersionHistory, StoreError> {
        let rows = self.repository.versions(artifact_id)?;
        Ok(VersionHistory::from_appended(rows))
    }

    /// Read the current artifact
    pub fn current(&self, artifact_id: Uuid) -> Result<Option<SummaryArtifact>, StoreError> {
        self.repository.load(artifact_id)
    }

    /// Record a newly created artifact: version 1 first, then the live state.
    ///
    /// If the save fails, version 1 stays behind as an orphan row. No live
    /// artifact exists for it, so lookups still report the id as missing.
    pub fn commit_create(&self, artifact: &SummaryArtifact) -> Result<(), StoreError> {
        self.with_lock(artifact.id, || {
            self.snapshot(artifact)?;
            self.repository.save(artifact)
        })
    }

    /// Snapshot the current state, apply `edit`, and write the result.
    ///
    /// If the snapshot cannot be appended the live artifact is left untouched.
    pub fn commit_edit<F>(&self, artifact_id: Uuid, edit: F) -> Result<SummaryArtifact, StoreError>
    where
        F: FnOnce(&mut SummaryArtifact),
    {
        self.with_lock(artifact_id, || {
            let mut artifact = self
                .repository
                .load(artifact_id)?
                .ok_or(StoreError::ArtifactNotFound(artifact_id))?;

            self.snapshot(&artifact)?;

            edit(&mut artifact);
            self.repository.save(&artifact)?;

            tracing::debug!(artifact_id = %artifact_id, "[VersionStore] Committed edit");
            Ok(artifact)
        })
    }
}
