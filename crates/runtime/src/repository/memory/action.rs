//! In-memory ActionRepository implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use werewolf_core::{ActionId, ActionRecord, ActionStatus, InstanceId};

use crate::repository::{ActionRepository, RepositoryError, Result};

/// Action records of every instance, keyed by id.
///
/// Ids are handed out in increasing order, so iterating the map yields
/// records in the order they were saved.
pub struct InMemoryActionRepo {
    records: RwLock<BTreeMap<ActionId, ActionRecord>>,
}

impl InMemoryActionRepo {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn set_status(&self, id: ActionId, status: ActionStatus) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::MissingRecord(id.to_string()))?;
        record.status = status;
        Ok(())
    }
}

impl Default for InMemoryActionRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRepository for InMemoryActionRepo {
    fn save_pending(&self, batch: &[ActionRecord]) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if let Some(duplicate) = batch.iter().find(|record| records.contains_key(&record.id)) {
            return Err(RepositoryError::CorruptedData(format!(
                "{} is already stored",
                duplicate.id
            )));
        }
        for record in batch {
            records.insert(record.id, record.clone());
        }
        Ok(())
    }

    fn load_pending(&self, instance: InstanceId) -> Result<Vec<ActionRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records
            .values()
            .filter(|record| record.instance == instance && record.is_pending())
            .cloned()
            .collect())
    }

    fn mark_executed(&self, id: ActionId) -> Result<()> {
        self.set_status(id, ActionStatus::Executed)
    }

    fn mark_complete(&self, id: ActionId) -> Result<()> {
        self.set_status(id, ActionStatus::Complete)
    }

    fn pending_count(&self, instance: InstanceId) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records
            .values()
            .filter(|record| {
                record.instance == instance && record.status == ActionStatus::NotExecuted
            })
            .count())
    }

    fn last_id(&self) -> Result<Option<ActionId>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.keys().next_back().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use werewolf_core::{Effect, PlayerIdentifier, PreActionData, UserId};

    fn record(id: u64, instance: u32) -> ActionRecord {
        let actor = PlayerIdentifier::new(InstanceId(instance), UserId(1));
        ActionRecord {
            id: ActionId(id),
            instance: InstanceId(instance),
            time: DateTime::<Utc>::UNIX_EPOCH,
            effect: Effect::HealPlayer,
            payload: PreActionData::new(actor, Default::default()),
            status: ActionStatus::NotExecuted,
        }
    }

    #[test]
    fn pending_records_are_scoped_to_their_instance() {
        let repo = InMemoryActionRepo::new();
        repo.save_pending(&[record(1, 1), record(2, 2), record(3, 1)]).unwrap();

        let pending = repo.load_pending(InstanceId(1)).unwrap();
        assert_eq!(
            pending.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![ActionId(1), ActionId(3)]
        );

        repo.mark_executed(ActionId(1)).unwrap();
        assert_eq!(repo.pending_count(InstanceId(1)).unwrap(), 1);
        assert_eq!(repo.load_pending(InstanceId(1)).unwrap().len(), 2);

        repo.mark_complete(ActionId(1)).unwrap();
        assert_eq!(repo.load_pending(InstanceId(1)).unwrap().len(), 1);
    }

    #[test]
    fn batches_with_a_stored_id_are_rejected_whole() {
        let repo = InMemoryActionRepo::new();
        repo.save_pending(&[record(1, 1)]).unwrap();

        let result = repo.save_pending(&[record(2, 1), record(1, 1)]);
        assert!(matches!(result, Err(RepositoryError::CorruptedData(_))));
        assert_eq!(repo.load_pending(InstanceId(1)).unwrap().len(), 1);
    }

    #[test]
    fn marking_an_unknown_record_fails() {
        let repo = InMemoryActionRepo::new();
        assert!(matches!(
            repo.mark_complete(ActionId(9)),
            Err(RepositoryError::MissingRecord(_))
        ));
    }
}
