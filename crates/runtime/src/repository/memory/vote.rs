//! In-memory VoteRepository implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use werewolf_core::{Ballot, InstanceId, PlayerIdentifier, VoteId, VoteRecord, VoteType};

use crate::repository::{RepositoryError, Result, VoteRepository};

#[derive(Default)]
struct VoteTable {
    last_id: u32,
    votes: BTreeMap<VoteId, VoteRecord>,
    ballots: HashMap<VoteId, Vec<Ballot>>,
}

impl VoteTable {
    fn vote_mut(&mut self, id: VoteId) -> Result<&mut VoteRecord> {
        self.votes
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::MissingRecord(id.to_string()))
    }
}

pub struct InMemoryVoteRepo {
    table: RwLock<VoteTable>,
}

impl InMemoryVoteRepo {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(VoteTable::default()),
        }
    }
}

impl Default for InMemoryVoteRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl VoteRepository for InMemoryVoteRepo {
    fn create(
        &self,
        instance: InstanceId,
        vote_type: VoteType,
        allowed: Vec<PlayerIdentifier>,
    ) -> Result<VoteRecord> {
        let mut table = self
            .table
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        table.last_id += 1;
        let record = VoteRecord::new(VoteId(table.last_id), instance, vote_type, allowed);
        table.votes.insert(record.id, record.clone());
        Ok(record)
    }

    fn load(&self, id: VoteId) -> Result<Option<VoteRecord>> {
        let table = self
            .table
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(table.votes.get(&id).cloned())
    }

    fn save_ballot(&self, id: VoteId, ballot: Ballot) -> Result<()> {
        let mut table = self
            .table
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        table.vote_mut(id)?;
        table.ballots.entry(id).or_default().push(ballot);
        Ok(())
    }

    fn load_ballots(&self, id: VoteId) -> Result<Vec<Ballot>> {
        let table = self
            .table
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(table.ballots.get(&id).cloned().unwrap_or_default())
    }

    fn set_started(&self, id: VoteId, started: bool) -> Result<()> {
        let mut table = self
            .table
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        table.vote_mut(id)?.started = started;
        Ok(())
    }

    fn set_ended(&self, id: VoteId, ended: bool) -> Result<()> {
        let mut table = self
            .table
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        table.vote_mut(id)?.ended = ended;
        Ok(())
    }

    fn ongoing(&self, instance: InstanceId) -> Result<Vec<VoteRecord>> {
        let table = self
            .table
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(table
            .votes
            .values()
            .filter(|vote| vote.instance == instance && vote.is_ongoing())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werewolf_core::UserId;

    fn pid(user: u32) -> PlayerIdentifier {
        PlayerIdentifier::new(InstanceId(1), UserId(user))
    }

    #[test]
    fn votes_get_increasing_ids_and_start_closed() {
        let repo = InMemoryVoteRepo::new();
        let first = repo.create(InstanceId(1), VoteType::Lynch, vec![pid(1)]).unwrap();
        let second = repo.create(InstanceId(1), VoteType::Mayor, vec![pid(1)]).unwrap();

        assert_eq!(first.id, VoteId(1));
        assert_eq!(second.id, VoteId(2));
        assert!(!first.started && !first.ended);
        assert!(repo.ongoing(InstanceId(1)).unwrap().is_empty());

        repo.set_started(second.id, true).unwrap();
        let ongoing = repo.ongoing(InstanceId(1)).unwrap();
        assert_eq!(ongoing.len(), 1);
        assert_eq!(ongoing[0].vote_type, VoteType::Mayor);

        repo.set_ended(second.id, true).unwrap();
        assert!(repo.ongoing(InstanceId(1)).unwrap().is_empty());
    }

    #[test]
    fn ballots_keep_submission_order() {
        let repo = InMemoryVoteRepo::new();
        let vote = repo
            .create(InstanceId(1), VoteType::Lynch, vec![pid(1), pid(2)])
            .unwrap();
        repo.save_ballot(vote.id, Ballot::new(pid(2), pid(1))).unwrap();
        repo.save_ballot(vote.id, Ballot::new(pid(1), pid(2))).unwrap();

        let ballots = repo.load_ballots(vote.id).unwrap();
        assert_eq!(ballots[0].voter, pid(2));
        assert_eq!(ballots[1].voter, pid(1));
        assert!(repo.save_ballot(VoteId(9), Ballot::new(pid(1), pid(2))).is_err());
    }
}
