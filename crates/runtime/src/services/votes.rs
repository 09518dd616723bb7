//! Vote lifecycle on top of a [`VoteRepository`].
//!
//! Submissions to one vote are serialized through a per-vote lock, so the
//! ballot count seen by the unanimity check always includes every ballot
//! stored before it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use werewolf_core::{
    Ballot, InstanceId, InstanceState, PlayerIdentifier, SubmitOutcome, Tally, Vote, VoteError,
    VoteId, VoteRecord, VoteType,
};

use crate::api::{Result, RuntimeError};
use crate::repository::VoteRepository;

pub struct VoteService {
    repository: Arc<dyn VoteRepository>,
    locks: Mutex<HashMap<VoteId, Arc<AsyncMutex<()>>>>,
}

impl VoteService {
    pub fn new(repository: Arc<dyn VoteRepository>) -> Self {
        Self {
            repository,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Lock of an ongoing vote of `instance`.
    ///
    /// Unknown and ended votes get no lock, so the map only holds votes that
    /// [`close`](Self::close) will release.
    fn lock_for(&self, instance: InstanceId, id: VoteId) -> Result<Arc<AsyncMutex<()>>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(&id) {
            return Ok(Arc::clone(lock));
        }
        if self.load_in(instance, id)?.ended {
            return Err(VoteError::VoteClosed(id).into());
        }
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    fn release(&self, id: VoteId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.remove(&id);
    }

    /// Loads a vote and checks it belongs to `instance`.
    fn load_in(&self, instance: InstanceId, id: VoteId) -> Result<VoteRecord> {
        self.repository
            .load(id)?
            .filter(|record| record.instance == instance)
            .ok_or(RuntimeError::UnknownVote(id))
    }

    /// Creates and starts a vote of `vote_type` for the current participants.
    ///
    /// Returns `None` when nobody could take part.
    pub fn open(&self, state: &InstanceState, vote_type: VoteType) -> Result<Option<VoteRecord>> {
        let allowed = vote_type.participants(state);
        if allowed.is_empty() {
            return Ok(None);
        }

        let draft = VoteRecord::new(VoteId(0), state.id, vote_type, allowed.iter().copied());
        Vote::create(draft, state)?;

        let mut record = self.repository.create(state.id, vote_type, allowed)?;
        self.repository.set_started(record.id, true)?;
        record.started = true;

        debug!(
            target: "runtime::votes",
            instance = %state.id,
            vote = %record.id,
            vote_type = %vote_type,
            voters = record.allowed().len(),
            "Vote opened"
        );
        Ok(Some(record))
    }

    /// Validates and stores one ballot.
    pub async fn submit(
        &self,
        instance: InstanceId,
        id: VoteId,
        caller: PlayerIdentifier,
        ballot: Ballot,
    ) -> Result<SubmitOutcome> {
        let lock = self.lock_for(instance, id)?;
        let _guard = lock.lock().await;

        let vote = Vote::retrieve(self.load_in(instance, id)?)?;
        let ballots = self.repository.load_ballots(id)?;
        vote.check_ballot(&ballots, caller, &ballot)?;
        self.repository.save_ballot(id, ballot)?;

        let outcome = vote.after_submit(ballots.len() + 1);
        debug!(
            target: "runtime::votes",
            instance = %instance,
            vote = %id,
            voter = %ballot.voter,
            outcome = ?outcome,
            "Ballot stored"
        );
        Ok(outcome)
    }

    /// Ends a vote and counts its ballots. Ending a vote twice fails.
    pub async fn close(&self, instance: InstanceId, id: VoteId) -> Result<(VoteRecord, Tally)> {
        let lock = self.lock_for(instance, id)?;
        let guard = lock.lock().await;

        let record = self.load_in(instance, id)?;
        if record.ended {
            return Err(VoteError::VoteClosed(id).into());
        }
        let mut vote = Vote::retrieve(record)?;
        let ballots = self.repository.load_ballots(id)?;
        let tally = vote.end(&ballots);
        self.repository.set_ended(id, true)?;

        drop(guard);
        self.release(id);

        debug!(
            target: "runtime::votes",
            instance = %instance,
            vote = %id,
            ballots = ballots.len(),
            "Vote closed"
        );
        Ok((vote.into_record(), tally))
    }

    pub fn ongoing(&self, instance: InstanceId) -> Result<Vec<VoteRecord>> {
        Ok(self.repository.ongoing(instance)?)
    }

    pub fn ongoing_of(&self, instance: InstanceId, vote_type: VoteType) -> Result<Vec<VoteRecord>> {
        let mut votes = self.ongoing(instance)?;
        votes.retain(|record| record.vote_type == vote_type);
        Ok(votes)
    }

    pub fn ballots(&self, instance: InstanceId, id: VoteId) -> Result<Vec<Ballot>> {
        self.load_in(instance, id)?;
        Ok(self.repository.load_ballots(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werewolf_core::{GameConfig, MainRole, UserId};

    use crate::repository::InMemoryVoteRepo;

    fn started_instance(roles: &[MainRole]) -> InstanceState {
        let mut state = InstanceState::new(InstanceId(1), UserId(100));
        for user in 1..=roles.len() as u32 {
            state.join(UserId(user)).unwrap();
        }
        state
            .start_game(UserId(100), roles.to_vec(), 12 * 60, &GameConfig::new())
            .unwrap();
        state
    }

    fn pid(user: u32) -> PlayerIdentifier {
        PlayerIdentifier::new(InstanceId(1), UserId(user))
    }

    fn service() -> VoteService {
        VoteService::new(Arc::new(InMemoryVoteRepo::new()))
    }

    #[tokio::test]
    async fn lynch_vote_counts_ballots() {
        let state = started_instance(&[
            MainRole::Werewolf,
            MainRole::Healer,
            MainRole::Townsperson,
        ]);
        let votes = service();
        let record = votes.open(&state, VoteType::Lynch).unwrap().unwrap();
        assert!(record.is_ongoing());
        assert_eq!(record.allowed().len(), 3);

        for voter in [2, 3] {
            let outcome = votes
                .submit(state.id, record.id, pid(voter), Ballot::new(pid(voter), pid(1)))
                .await
                .unwrap();
            assert_eq!(outcome, SubmitOutcome::Recorded);
        }
        assert_eq!(votes.ongoing(state.id).unwrap().len(), 1);

        let (ended, tally) = votes.close(state.id, record.id).await.unwrap();
        assert!(ended.ended);
        assert_eq!(tally.count_of(pid(1)), 2);
        assert!(votes.ongoing(state.id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn ballots_are_checked_against_stored_ones() {
        let state = started_instance(&[MainRole::Werewolf, MainRole::Healer]);
        let votes = service();
        let record = votes.open(&state, VoteType::Mayor).unwrap().unwrap();

        let fraud = votes
            .submit(state.id, record.id, pid(1), Ballot::new(pid(2), pid(1)))
            .await;
        assert!(matches!(
            fraud,
            Err(RuntimeError::Vote(VoteError::VoterFraud { .. }))
        ));

        votes
            .submit(state.id, record.id, pid(2), Ballot::new(pid(2), pid(1)))
            .await
            .unwrap();
        let twice = votes
            .submit(state.id, record.id, pid(2), Ballot::new(pid(2), pid(2)))
            .await;
        assert!(matches!(
            twice,
            Err(RuntimeError::Vote(VoteError::AlreadyVoted(_)))
        ));
        assert_eq!(votes.ballots(state.id, record.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn alpha_wolf_vote_reports_unanimity() {
        let state = started_instance(&[
            MainRole::Werewolf,
            MainRole::WerewolfElder,
            MainRole::Healer,
        ]);
        let votes = service();
        let record = votes.open(&state, VoteType::AlphaWolf).unwrap().unwrap();
        assert_eq!(record.allowed().len(), 2);

        let first = votes
            .submit(state.id, record.id, pid(1), Ballot::new(pid(1), pid(2)))
            .await
            .unwrap();
        let second = votes
            .submit(state.id, record.id, pid(2), Ballot::new(pid(2), pid(2)))
            .await
            .unwrap();
        assert_eq!(first, SubmitOutcome::Recorded);
        assert_eq!(second, SubmitOutcome::Unanimous);
    }

    #[tokio::test]
    async fn closed_votes_reject_ballots_and_a_second_close() {
        let state = started_instance(&[MainRole::Werewolf, MainRole::Healer]);
        let votes = service();
        let record = votes.open(&state, VoteType::Lynch).unwrap().unwrap();
        votes.close(state.id, record.id).await.unwrap();

        let late = votes
            .submit(state.id, record.id, pid(1), Ballot::new(pid(1), pid(2)))
            .await;
        assert!(matches!(late, Err(RuntimeError::Vote(VoteError::VoteClosed(_)))));
        let again = votes.close(state.id, record.id).await;
        assert!(matches!(again, Err(RuntimeError::Vote(VoteError::VoteClosed(_)))));
    }

    #[tokio::test]
    async fn votes_of_other_instances_are_unknown() {
        let state = started_instance(&[MainRole::Werewolf, MainRole::Healer]);
        let votes = service();
        let record = votes.open(&state, VoteType::Lynch).unwrap().unwrap();

        let result = votes.close(InstanceId(2), record.id).await;
        assert!(matches!(result, Err(RuntimeError::UnknownVote(id)) if id == record.id));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn racing_ballots_of_one_voter_store_only_one() {
        let state = started_instance(&[
            MainRole::Werewolf,
            MainRole::Healer,
            MainRole::Townsperson,
        ]);
        let votes = Arc::new(service());
        let vote_id = votes.open(&state, VoteType::Lynch).unwrap().unwrap().id;

        let submit = |target: u32| {
            let votes = Arc::clone(&votes);
            tokio::spawn(async move {
                votes
                    .submit(InstanceId(1), vote_id, pid(2), Ballot::new(pid(2), pid(target)))
                    .await
            })
        };
        let (first, second) = tokio::join!(submit(1), submit(3));
        let results = [first.unwrap(), second.unwrap()];

        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        assert!(results.iter().any(|result| matches!(
            result,
            Err(RuntimeError::Vote(VoteError::AlreadyVoted(voter))) if *voter == pid(2)
        )));
        assert_eq!(votes.ballots(state.id, vote_id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_and_closed_votes_get_no_lock() {
        let state = started_instance(&[MainRole::Werewolf, MainRole::Healer]);
        let votes = service();

        let unknown = votes
            .submit(state.id, VoteId(99), pid(1), Ballot::new(pid(1), pid(2)))
            .await;
        assert!(matches!(unknown, Err(RuntimeError::UnknownVote(_))));
        assert!(votes.close(state.id, VoteId(99)).await.is_err());
        assert!(votes.locks.lock().unwrap().is_empty());

        let record = votes.open(&state, VoteType::Lynch).unwrap().unwrap();
        votes
            .submit(state.id, record.id, pid(1), Ballot::new(pid(1), pid(2)))
            .await
            .unwrap();
        assert_eq!(votes.locks.lock().unwrap().len(), 1);

        votes.close(state.id, record.id).await.unwrap();
        let late = votes
            .submit(state.id, record.id, pid(2), Ballot::new(pid(2), pid(1)))
            .await;
        assert!(matches!(late, Err(RuntimeError::Vote(VoteError::VoteClosed(_)))));
        assert!(votes.locks.lock().unwrap().is_empty());
    }

    #[test]
    fn no_participants_means_no_vote() {
        let state = started_instance(&[MainRole::Healer, MainRole::Townsperson]);
        let votes = service();
        assert!(votes.open(&state, VoteType::AlphaWolf).unwrap().is_none());
    }
}
