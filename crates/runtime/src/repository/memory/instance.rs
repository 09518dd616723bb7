//! In-memory InstanceRepository implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use werewolf_core::{InstanceId, InstanceState};

use crate::repository::{InstanceRepository, RepositoryError, Result};

/// Keeps one snapshot per instance.
pub struct InMemoryInstanceRepo {
    states: RwLock<HashMap<InstanceId, InstanceState>>,
}

impl InMemoryInstanceRepo {
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryInstanceRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceRepository for InMemoryInstanceRepo {
    fn save(&self, state: &InstanceState) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.insert(state.id, state.clone());
        Ok(())
    }

    fn load(&self, id: InstanceId) -> Result<Option<InstanceState>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.get(&id).cloned())
    }

    fn delete(&self, id: InstanceId) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.remove(&id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<InstanceId>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<InstanceId> = states.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
