use crate::error::{ErrorKind, ErrorSeverity, GameError};
use crate::state::{PlayerIdentifier, StateError, VoteId};
use crate::vote::VoteType;

/// Errors raised while creating, submitting to or resolving a vote.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoteError {
    #[error("{0} is not allowed to vote")]
    NotAllowedToVote(PlayerIdentifier),

    #[error("{0} is not a valid target")]
    NotAllowedTarget(PlayerIdentifier),

    #[error("vote {0} has not started")]
    VoteNotStarted(VoteId),

    #[error("vote {0} is closed")]
    VoteClosed(VoteId),

    #[error("{caller} submitted a ballot in the name of {voter}")]
    VoterFraud {
        caller: PlayerIdentifier,
        voter: PlayerIdentifier,
    },

    #[error("{0} has already voted")]
    AlreadyVoted(PlayerIdentifier),

    #[error("{0} is not a werewolf and is not allowed to join this vote")]
    NotAllowedToJoinVote(PlayerIdentifier),

    #[error("vote {id} of type {vote_type} cannot be handled")]
    NoSuchVote { id: VoteId, vote_type: VoteType },

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for VoteError {
    fn kind(&self) -> ErrorKind {
        use VoteError::*;

        match self {
            NotAllowedToVote(_) | NotAllowedTarget(_) | NotAllowedToJoinVote(_) => {
                ErrorKind::Permission
            }
            VoteNotStarted(_) | VoteClosed(_) => ErrorKind::State,
            VoterFraud { .. } | AlreadyVoted(_) => ErrorKind::Integrity,
            NoSuchVote { .. } => ErrorKind::NotFound,
            State(inner) => inner.kind(),
        }
    }

    fn severity(&self) -> ErrorSeverity {
        use VoteError::*;

        match self {
            VoteNotStarted(_) => ErrorSeverity::Recoverable,
            State(inner) => inner.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use VoteError::*;

        match self {
            NotAllowedToVote(_) => "VOTE_NOT_ALLOWED_TO_VOTE",
            NotAllowedTarget(_) => "VOTE_NOT_ALLOWED_TARGET",
            VoteNotStarted(_) => "VOTE_NOT_STARTED",
            VoteClosed(_) => "VOTE_CLOSED",
            VoterFraud { .. } => "VOTE_VOTER_FRAUD",
            AlreadyVoted(_) => "VOTE_ALREADY_VOTED",
            NotAllowedToJoinVote(_) => "VOTE_NOT_ALLOWED_TO_JOIN",
            NoSuchVote { .. } => "VOTE_NO_SUCH_VOTE",
            State(inner) => inner.error_code(),
        }
    }
}
