//! Votes, ballots and their resolution.
//!
//! A vote moves from created to started to ended; ballots are accepted only
//! while it is started. Which rules apply is decided by the stored
//! [`VoteType`]: [`Vote`] is rebuilt from a [`VoteRecord`] through
//! [`Vote::retrieve`] instead of storing behavior.

mod error;
mod resolve;

pub use error::VoteError;
pub use resolve::{AlphaWolfOutcome, LynchOutcome, VoteResolution, resolve};

use std::collections::{BTreeMap, BTreeSet};

use crate::role::Group;
use crate::state::{InstanceId, InstanceState, PlayerIdentifier, VoteId};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum VoteType {
    Lynch,
    Mayor,
    AlphaWolf,
    Misc,
}

impl VoteType {
    /// Players that may take part in a new vote of this type.
    ///
    /// Lynch and mayor votes are open to alive home owners that are not
    /// muted, the alpha wolf vote to alive players of the werewolf faction.
    pub fn participants(self, state: &InstanceState) -> Vec<PlayerIdentifier> {
        match self {
            VoteType::Lynch | VoteType::Mayor => state
                .alive_players()
                .filter(|player| player.house.is_some() && !player.is_muted())
                .map(|player| player.id)
                .collect(),
            VoteType::AlphaWolf => state
                .alive_players()
                .filter(|player| {
                    player
                        .main_role
                        .is_some_and(|role| role.group() == Group::Werewolves)
                })
                .map(|player| player.id)
                .collect(),
            VoteType::Misc => Vec::new(),
        }
    }
}

/// One player's choice in one vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ballot {
    pub voter: PlayerIdentifier,
    pub target: PlayerIdentifier,
}

impl Ballot {
    pub const fn new(voter: PlayerIdentifier, target: PlayerIdentifier) -> Self {
        Self { voter, target }
    }
}

/// Stored shape of a vote. The allowed set doubles as voters and targets and
/// never changes after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoteRecord {
    pub id: VoteId,
    pub instance: InstanceId,
    pub vote_type: VoteType,
    allowed: BTreeSet<PlayerIdentifier>,
    pub started: bool,
    pub ended: bool,
}

impl VoteRecord {
    pub fn new(
        id: VoteId,
        instance: InstanceId,
        vote_type: VoteType,
        allowed: impl IntoIterator<Item = PlayerIdentifier>,
    ) -> Self {
        Self {
            id,
            instance,
            vote_type,
            allowed: allowed.into_iter().collect(),
            started: false,
            ended: false,
        }
    }

    pub fn allowed(&self) -> &BTreeSet<PlayerIdentifier> {
        &self.allowed
    }

    pub fn is_allowed(&self, player: PlayerIdentifier) -> bool {
        self.allowed.contains(&player)
    }

    /// Started and not yet ended.
    pub fn is_ongoing(&self) -> bool {
        self.started && !self.ended
    }
}

/// What a successful submission implies for the vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Recorded,
    /// Every allowed player has voted; the vote must end now.
    Unanimous,
}

/// Votes per target, highest first. Equal counts are ordered by player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    entries: Vec<(PlayerIdentifier, u32)>,
}

impl Tally {
    pub fn from_ballots<'a>(ballots: impl IntoIterator<Item = &'a Ballot>) -> Self {
        let mut counts: BTreeMap<PlayerIdentifier, u32> = BTreeMap::new();
        for ballot in ballots {
            *counts.entry(ballot.target).or_default() += 1;
        }
        let mut entries: Vec<_> = counts.into_iter().collect();
        // BTreeMap order is by player, so a stable sort keeps it for ties.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    pub fn entries(&self) -> &[(PlayerIdentifier, u32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, player: PlayerIdentifier) -> u32 {
        self.entries
            .iter()
            .find(|(target, _)| *target == player)
            .map_or(0, |(_, count)| *count)
    }
}

/// A vote with the rules of its type attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Vote {
    /// Lynch and mayor votes.
    Player(VoteRecord),
    /// Ends itself once every werewolf has voted.
    AlphaWolf(VoteRecord),
}

impl Vote {
    /// Rebuilds a vote from its stored record.
    pub fn retrieve(record: VoteRecord) -> Result<Self, VoteError> {
        match record.vote_type {
            VoteType::Lynch | VoteType::Mayor => Ok(Vote::Player(record)),
            VoteType::AlphaWolf => Ok(Vote::AlphaWolf(record)),
            VoteType::Misc => Err(VoteError::NoSuchVote {
                id: record.id,
                vote_type: record.vote_type,
            }),
        }
    }

    /// Creates a new vote, checking the type's membership rules.
    pub fn create(record: VoteRecord, state: &InstanceState) -> Result<Self, VoteError> {
        let vote = Self::retrieve(record)?;
        if let Vote::AlphaWolf(record) = &vote {
            for member in record.allowed() {
                let is_wolf = state
                    .player(*member)
                    .and_then(|player| player.main_role)
                    .is_some_and(|role| role.group() == Group::Werewolves);
                if !is_wolf {
                    return Err(VoteError::NotAllowedToJoinVote(*member));
                }
            }
        }
        Ok(vote)
    }

    pub fn record(&self) -> &VoteRecord {
        match self {
            Vote::Player(record) | Vote::AlphaWolf(record) => record,
        }
    }

    fn record_mut(&mut self) -> &mut VoteRecord {
        match self {
            Vote::Player(record) | Vote::AlphaWolf(record) => record,
        }
    }

    pub fn into_record(self) -> VoteRecord {
        match self {
            Vote::Player(record) | Vote::AlphaWolf(record) => record,
        }
    }

    pub fn id(&self) -> VoteId {
        self.record().id
    }

    pub fn vote_type(&self) -> VoteType {
        self.record().vote_type
    }

    pub fn start(&mut self) {
        self.record_mut().started = true;
    }

    /// Checks whether `caller` may cast `ballot` given the ballots already
    /// stored. The first failing check decides the error.
    pub fn check_ballot(
        &self,
        ballots: &[Ballot],
        caller: PlayerIdentifier,
        ballot: &Ballot,
    ) -> Result<(), VoteError> {
        let record = self.record();
        if !record.is_allowed(ballot.voter) {
            return Err(VoteError::NotAllowedToVote(ballot.voter));
        }
        if !record.is_allowed(ballot.target) {
            return Err(VoteError::NotAllowedTarget(ballot.target));
        }
        if !record.started {
            return Err(VoteError::VoteNotStarted(record.id));
        }
        if record.ended {
            return Err(VoteError::VoteClosed(record.id));
        }
        if ballot.voter != caller {
            return Err(VoteError::VoterFraud {
                caller,
                voter: ballot.voter,
            });
        }
        if ballots.iter().any(|stored| stored.voter == ballot.voter) {
            return Err(VoteError::AlreadyVoted(ballot.voter));
        }
        Ok(())
    }

    /// Hook run after a ballot was stored; `ballot_count` includes it.
    pub fn after_submit(&self, ballot_count: usize) -> SubmitOutcome {
        match self {
            Vote::AlphaWolf(record) if ballot_count == record.allowed().len() => {
                SubmitOutcome::Unanimous
            }
            _ => SubmitOutcome::Recorded,
        }
    }

    /// Ends the vote and counts the ballots.
    pub fn end(&mut self, ballots: &[Ballot]) -> Tally {
        self.record_mut().ended = true;
        Tally::from_ballots(ballots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::MainRole;
    use crate::state::tests::{create_test_instance, pid};

    fn started(vote_type: VoteType, allowed: &[u32]) -> Vote {
        let mut vote = Vote::retrieve(VoteRecord::new(
            VoteId(1),
            InstanceId(1),
            vote_type,
            allowed.iter().map(|user| pid(*user)),
        ))
        .unwrap();
        vote.start();
        vote
    }

    #[test]
    fn checks_run_in_order() {
        let mut vote = Vote::retrieve(VoteRecord::new(
            VoteId(7),
            InstanceId(1),
            VoteType::Lynch,
            [pid(1), pid(2)],
        ))
        .unwrap();

        let outsider = Ballot::new(pid(3), pid(9));
        assert_eq!(
            vote.check_ballot(&[], pid(1), &outsider),
            Err(VoteError::NotAllowedToVote(pid(3)))
        );
        assert_eq!(
            vote.check_ballot(&[], pid(1), &Ballot::new(pid(1), pid(3))),
            Err(VoteError::NotAllowedTarget(pid(3)))
        );
        let ballot = Ballot::new(pid(1), pid(2));
        assert_eq!(
            vote.check_ballot(&[], pid(1), &ballot),
            Err(VoteError::VoteNotStarted(VoteId(7)))
        );

        vote.start();
        assert!(vote.check_ballot(&[], pid(1), &ballot).is_ok());
        vote.end(&[]);
        assert_eq!(
            vote.check_ballot(&[], pid(1), &ballot),
            Err(VoteError::VoteClosed(VoteId(7)))
        );
    }

    #[test]
    fn forged_ballots_are_rejected() {
        let vote = started(VoteType::Lynch, &[1, 2, 3]);
        let forged = Ballot::new(pid(2), pid(3));
        assert_eq!(
            vote.check_ballot(&[], pid(1), &forged),
            Err(VoteError::VoterFraud {
                caller: pid(1),
                voter: pid(2)
            })
        );
    }

    #[test]
    fn second_ballot_is_rejected_even_for_another_target() {
        let vote = started(VoteType::Mayor, &[1, 2, 3]);
        let stored = [Ballot::new(pid(1), pid(2))];
        assert_eq!(
            vote.check_ballot(&stored, pid(1), &Ballot::new(pid(1), pid(3))),
            Err(VoteError::AlreadyVoted(pid(1)))
        );
    }

    #[test]
    fn only_alpha_wolf_votes_end_on_unanimity() {
        let wolves = started(VoteType::AlphaWolf, &[1, 2]);
        assert_eq!(wolves.after_submit(1), SubmitOutcome::Recorded);
        assert_eq!(wolves.after_submit(2), SubmitOutcome::Unanimous);

        let lynch = started(VoteType::Lynch, &[1, 2]);
        assert_eq!(lynch.after_submit(2), SubmitOutcome::Recorded);
    }

    #[test]
    fn alpha_wolf_votes_admit_only_werewolves() {
        let state = create_test_instance(&[MainRole::Werewolf, MainRole::Healer]);
        let record = VoteRecord::new(VoteId(1), InstanceId(1), VoteType::AlphaWolf, [pid(1), pid(2)]);
        assert_eq!(
            Vote::create(record, &state),
            Err(VoteError::NotAllowedToJoinVote(pid(2)))
        );
        assert_eq!(VoteType::AlphaWolf.participants(&state), vec![pid(1)]);
    }

    #[test]
    fn misc_votes_cannot_be_retrieved() {
        let record = VoteRecord::new(VoteId(4), InstanceId(1), VoteType::Misc, []);
        assert!(matches!(
            Vote::retrieve(record),
            Err(VoteError::NoSuchVote { .. })
        ));
    }

    #[test]
    fn tally_orders_by_count_then_player() {
        let ballots = [
            Ballot::new(pid(1), pid(3)),
            Ballot::new(pid(2), pid(2)),
            Ballot::new(pid(3), pid(3)),
            Ballot::new(pid(4), pid(1)),
        ];
        let tally = Tally::from_ballots(&ballots);
        assert_eq!(tally.entries(), &[(pid(3), 2), (pid(1), 1), (pid(2), 1)]);
        assert_eq!(tally.count_of(pid(4)), 0);
    }

    #[test]
    fn muted_players_sit_out_public_votes() {
        let mut state =
            create_test_instance(&[MainRole::Werewolf, MainRole::WerewolfElder, MainRole::Healer]);
        state.set_muted(pid(1), true).unwrap();
        state.set_muted(pid(3), true).unwrap();

        assert_eq!(VoteType::Lynch.participants(&state), vec![pid(2)]);
        assert_eq!(VoteType::Mayor.participants(&state), vec![pid(2)]);
        assert_eq!(VoteType::AlphaWolf.participants(&state), vec![pid(1), pid(2)]);

        state.set_muted(pid(3), false).unwrap();
        assert_eq!(VoteType::Lynch.participants(&state), vec![pid(2), pid(3)]);
    }
}
