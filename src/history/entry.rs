//! Version snapshot records.

use crate::model::SummaryArtifact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Immutable snapshot of an artifact at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactVersion {
    pub version_id: Uuid,
    pub artifact_id: Uuid,
    pub title: String,
    pub summary: String,
    /// Bullet points joined by newlines
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ArtifactVersion {
    /// Capture the artifact's current state
    pub fn capture(artifact: &SummaryArtifact) -> Self {
        Self {
            version_id: Uuid::new_v4(),
            artifact_id: artifact.id,
            title: artifact.title.clone(),
            summary: artifact.summary.clone(),
            content: artifact.content(),
            created_at: Utc::now(),
        }
    }

    /// Bullet points recovered from `content`
    pub fn bullet_points(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }
}

/// Ordered, oldest-first view over an artifact's versions.
///
/// Cloning is cheap and every call to [`VersionHistory::iter`] starts over
/// from the oldest entry.
#[derive(Debug, Clone)]
pub struct VersionHistory {
    versions: Arc<[ArtifactVersion]>,
}

impl VersionHistory {
    /// Sort by `created_at`, keeping append order for equal timestamps
    pub(crate) fn from_appended(mut versions: Vec<ArtifactVersion>) -> Self {
        versions.sort_by_key(|v| v.created_at);
        Self {
            versions: versions.into(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArtifactVersion> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArtifactVersion> {
        self.versions.get(index)
    }

    pub fn first(&self) -> Option<&ArtifactVersion> {
        self.versions.first()
    }

    pub fn last(&self) -> Option<&ArtifactVersion> {
        self.versions.last()
    }

    pub fn to_vec(&self) -> Vec<ArtifactVersion> {
        self.versions.to_vec()
    }
}

impl<'a> IntoIterator for &'a VersionHistory {
    type Item = &'a ArtifactVersion;
    type IntoIter = std::slice::Iter<'a, ArtifactVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
