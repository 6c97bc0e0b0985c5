//! File-backed artifact repository.
//!
//! Layout under the data directory:
//! - `{id}.artifact.json` - current artifact state, replaced atomically
//! - `{id}.versions.jsonl` - append-only version rows, one JSON object per line

use super::entry::ArtifactVersion;
use super::repository::{ArtifactRepository, StoreError};
use crate::model::SummaryArtifact;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Artifact file extension
const ARTIFACT_EXTENSION: &str = "artifact.json";

/// Version log extension
const VERSIONS_EXTENSION: &str = "versions.jsonl";

pub struct FileRepository {
    data_dir: PathBuf,
}

impl FileRepository {
    /// Open a repository rooted at `data_dir`, creating the directory if needed
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        tracing::debug!("[FileRepository] Using {}", data_dir.display());
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn artifact_path(&self, id: Uuid) -> PathBuf {
        self.data_dir.join(format!("{}.{}", id, ARTIFACT_EXTENSION))
    }

    fn versions_path(&self, id: Uuid) -> PathBuf {
        self.data_dir.join(format!("{}.{}", id, VERSIONS_EXTENSION))
    }

    /// Atomically write JSON to a file
    fn atomic_write<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
        // Write to temporary file first
        let temp_path = path.with_extension("tmp");

        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.flush()?;

        // Sync to disk
        writer.get_ref().sync_all()?;

        // Atomic rename
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    fn read_versions(file: &File) -> Result<Vec<ArtifactVersion>, StoreError> {
        let mut rows = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(serde_json::from_str(&line)?);
        }
        Ok(rows)
    }
}

impl ArtifactRepository for FileRepository {
    fn load(&self, id: Uuid) -> Result<Option<SummaryArtifact>, StoreError> {
        let file = match File::open(self.artifact_path(id)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let artifact = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(artifact))
    }

    fn save(&self, artifact: &SummaryArtifact) -> Result<(), StoreError> {
        Self::atomic_write(&self.artifact_path(artifact.id), artifact)?;
        tracing::debug!("[FileRepository] Saved artifact {}", artifact.id);
        Ok(())
    }

    fn append_version(&self, version: &ArtifactVersion) -> Result<(), StoreError> {
        let path = self.versions_path(version.artifact_id);
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;

        // Block until we get exclusive access
        FileExt::lock_exclusive(&file)?;

        let result = (|| -> Result<(), StoreError> {
            let existing = Self::read_versions(&file)?;
            if existing.iter().any(|v| v.version_id == version.version_id) {
                return Err(StoreError::DuplicateVersion(version.version_id));
            }

            let mut line = serde_json::to_string(version)?;
            line.push('\n');
            file.write_all(line.as_bytes())?;
            file.sync_all()?;
            Ok(())
        })();

        let _ = FileExt::unlock(&file);
        result
    }

    fn versions(&self, artifact_id: Uuid) -> Result<Vec<ArtifactVersion>, StoreError> {
        let file = match File::open(self.versions_path(artifact_id)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Self::read_versions(&file)
    }
}
