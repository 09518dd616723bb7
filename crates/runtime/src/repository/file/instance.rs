//! File-based InstanceRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use werewolf_core::{InstanceId, InstanceState};

use crate::repository::{InstanceRepository, RepositoryError, Result};

/// Stores instance snapshots as individual bincode files.
///
/// # File Format
///
/// Snapshots are stored as `instance_{id}.bin`. Writes go to a temporary file
/// first and are renamed into place, so a crash never leaves a half-written
/// snapshot behind.
pub struct FileInstanceRepository {
    base_dir: PathBuf,
}

impl FileInstanceRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn instance_path(&self, id: InstanceId) -> PathBuf {
        self.base_dir.join(format!("instance_{}.bin", id.get()))
    }
}

impl InstanceRepository for FileInstanceRepository {
    fn save(&self, state: &InstanceState) -> Result<()> {
        let path = self.instance_path(state.id);
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(state).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved {} to {}", state.id, path.display());
        Ok(())
    }

    fn load(&self, id: InstanceId) -> Result<Option<InstanceState>> {
        let path = self.instance_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let state: InstanceState = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        if state.id != id {
            return Err(RepositoryError::CorruptedData(format!(
                "{} holds a snapshot of {}",
                path.display(),
                state.id
            )));
        }

        tracing::debug!("Loaded {} from {}", id, path.display());
        Ok(Some(state))
    }

    fn delete(&self, id: InstanceId) -> Result<()> {
        let path = self.instance_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted {}", id);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<InstanceId>> {
        let mut ids = Vec::new();
        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id_str) = filename
                    .strip_prefix("instance_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(id) = id_str.parse::<u32>()
            {
                ids.push(InstanceId(id));
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
