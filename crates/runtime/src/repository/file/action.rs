//! File-based ActionRepository implementation.
//!
//! The pending queue of each instance is one JSON file:
//! ```text
//! {base_dir}/queue_{instance}.json
//! ```
//!
//! Every change rewrites the whole file through a temporary file and a
//! rename, so a batch is stored completely or not at all. COMPLETE records
//! are dropped from the file; the highest id ever stored stays recorded.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use werewolf_core::{ActionId, ActionRecord, ActionStatus, InstanceId};

use crate::repository::{ActionRepository, RepositoryError, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
struct QueueFile {
    last_id: Option<ActionId>,
    /// NOT_EXECUTED and EXECUTED records in the order they were saved.
    records: Vec<ActionRecord>,
}

/// Stores the action queue of every instance as JSON files, so a queue
/// survives restarts.
pub struct FileActionRepository {
    base_dir: PathBuf,
    /// Serializes read-modify-write cycles on the queue files.
    write_lock: Mutex<()>,
}

impl FileActionRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn queue_path(&self, instance: InstanceId) -> PathBuf {
        self.base_dir.join(format!("queue_{}.json", instance.get()))
    }

    fn read(&self, path: &Path) -> Result<QueueFile> {
        if !path.exists() {
            return Ok(QueueFile::default());
        }
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| RepositoryError::CorruptedData(format!("{}: {e}", path.display())))
    }

    fn write(&self, path: &Path, queue: &QueueFile) -> Result<()> {
        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(queue)
            .map_err(|e| RepositoryError::Serialization(format!("{}: {e}", path.display())))?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Every queue file in the directory.
    fn queue_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let is_queue = path
                .file_name()
                .and_then(|s| s.to_str())
                .is_some_and(|name| name.starts_with("queue_") && name.ends_with(".json"));
            if is_queue {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn set_status(&self, id: ActionId, status: ActionStatus) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        for path in self.queue_paths()? {
            let mut queue = self.read(&path)?;
            let Some(index) = queue.records.iter().position(|record| record.id == id) else {
                continue;
            };
            if status == ActionStatus::Complete {
                queue.records.remove(index);
            } else {
                queue.records[index].status = status;
            }
            return self.write(&path, &queue);
        }
        Err(RepositoryError::MissingRecord(id.to_string()))
    }
}

impl ActionRepository for FileActionRepository {
    fn save_pending(&self, records: &[ActionRecord]) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        let instance = first.instance;
        if records.iter().any(|record| record.instance != instance) {
            return Err(RepositoryError::CorruptedData(format!(
                "batch starting at {} spans several instances",
                first.id
            )));
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let path = self.queue_path(instance);
        let mut queue = self.read(&path)?;

        if let Some(duplicate) = records.iter().find(|record| {
            queue.last_id.is_some_and(|last| record.id <= last)
                || queue.records.iter().any(|stored| stored.id == record.id)
        }) {
            return Err(RepositoryError::CorruptedData(format!(
                "{} is already stored",
                duplicate.id
            )));
        }

        queue.records.extend(records.iter().cloned());
        queue.last_id = queue.records.iter().map(|record| record.id).max().max(queue.last_id);
        self.write(&path, &queue)?;

        tracing::debug!("Saved {} action records to {}", records.len(), path.display());
        Ok(())
    }

    fn load_pending(&self, instance: InstanceId) -> Result<Vec<ActionRecord>> {
        Ok(self.read(&self.queue_path(instance))?.records)
    }

    fn mark_executed(&self, id: ActionId) -> Result<()> {
        self.set_status(id, ActionStatus::Executed)
    }

    fn mark_complete(&self, id: ActionId) -> Result<()> {
        self.set_status(id, ActionStatus::Complete)
    }

    fn pending_count(&self, instance: InstanceId) -> Result<usize> {
        Ok(self
            .load_pending(instance)?
            .iter()
            .filter(|record| record.status == ActionStatus::NotExecuted)
            .count())
    }

    fn last_id(&self) -> Result<Option<ActionId>> {
        let mut last = None;
        for path in self.queue_paths()? {
            last = last.max(self.read(&path)?.last_id);
        }
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use werewolf_core::{ActionArgs, Effect, PlayerIdentifier, PreActionData, UserId};

    fn record(id: u64, instance: u32) -> ActionRecord {
        let actor = PlayerIdentifier::new(InstanceId(instance), UserId(1));
        ActionRecord {
            id: ActionId(id),
            instance: InstanceId(instance),
            time: DateTime::<Utc>::UNIX_EPOCH,
            effect: Effect::HealPlayer,
            payload: PreActionData::new(actor, ActionArgs::players([actor])),
            status: ActionStatus::NotExecuted,
        }
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn records_survive_a_new_repository() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileActionRepository::new(dir.path()).unwrap();
        repo.save_pending(&[record(1, 1), record(2, 1)]).unwrap();
        repo.save_pending(&[record(3, 2)]).unwrap();
        repo.mark_executed(ActionId(1)).unwrap();
        drop(repo);

        let repo = FileActionRepository::new(dir.path()).unwrap();
        let pending = repo.load_pending(InstanceId(1)).unwrap();
        assert_eq!(pending, vec![
            ActionRecord { status: ActionStatus::Executed, ..record(1, 1) },
            record(2, 1),
        ]);
        assert_eq!(repo.pending_count(InstanceId(1)).unwrap(), 1);
        assert_eq!(repo.last_id().unwrap(), Some(ActionId(3)));
        assert_eq!(files_in(dir.path()), ["queue_1.json", "queue_2.json"]);
    }

    #[test]
    fn complete_records_are_pruned_but_the_id_sequence_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileActionRepository::new(dir.path()).unwrap();
        repo.save_pending(&[record(1, 1), record(2, 1)]).unwrap();
        repo.mark_complete(ActionId(1)).unwrap();
        repo.mark_complete(ActionId(2)).unwrap();

        assert!(repo.load_pending(InstanceId(1)).unwrap().is_empty());
        assert_eq!(repo.last_id().unwrap(), Some(ActionId(2)));
        assert!(matches!(
            repo.mark_complete(ActionId(1)),
            Err(RepositoryError::MissingRecord(_))
        ));

        let json = fs::read_to_string(dir.path().join("queue_1.json")).unwrap();
        assert!(!json.contains("heal_player"));
    }

    #[test]
    fn a_rejected_batch_leaves_the_queue_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileActionRepository::new(dir.path()).unwrap();
        repo.save_pending(&[record(1, 1)]).unwrap();
        let before = fs::read_to_string(dir.path().join("queue_1.json")).unwrap();

        let duplicate = repo.save_pending(&[record(2, 1), record(1, 1)]);
        assert!(matches!(duplicate, Err(RepositoryError::CorruptedData(_))));
        let mixed = repo.save_pending(&[record(3, 1), record(4, 2)]);
        assert!(matches!(mixed, Err(RepositoryError::CorruptedData(_))));

        let after = fs::read_to_string(dir.path().join("queue_1.json")).unwrap();
        assert_eq!(before, after);
        assert_eq!(files_in(dir.path()), ["queue_1.json"]);
    }

    #[test]
    fn completed_ids_cannot_be_saved_again() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileActionRepository::new(dir.path()).unwrap();
        repo.save_pending(&[record(1, 1)]).unwrap();
        repo.mark_complete(ActionId(1)).unwrap();

        let result = repo.save_pending(&[record(1, 1)]);
        assert!(matches!(result, Err(RepositoryError::CorruptedData(_))));
    }

    #[test]
    fn an_empty_directory_has_no_last_id() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileActionRepository::new(dir.path()).unwrap();
        assert_eq!(repo.last_id().unwrap(), None);
        assert!(repo.load_pending(InstanceId(1)).unwrap().is_empty());
    }
}
