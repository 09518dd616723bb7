//! Event types for different topics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use werewolf_core::{
    ActionId, Clock, Effect, Group, InstanceId, PlayerIdentifier, Tally, TransitionPhase, VoteId,
    VoteType,
};

/// Clock changes of an instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PhaseEvent {
    /// Published after every phase advance, once all phase steps ran.
    PhaseChanged { instance: InstanceId, clock: Clock },
}

/// Vote lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VoteEvent {
    VoteStarted {
        instance: InstanceId,
        vote: VoteId,
        vote_type: VoteType,
        allowed: Vec<PlayerIdentifier>,
    },

    BallotRecorded {
        instance: InstanceId,
        vote: VoteId,
        voter: PlayerIdentifier,
    },

    /// `forced` is set when the vote ended before its phase did.
    VoteEnded {
        instance: InstanceId,
        vote: VoteId,
        vote_type: VoteType,
        tally: Tally,
        forced: bool,
    },
}

/// Action queue activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActionEvent {
    ActionQueued {
        instance: InstanceId,
        action_id: ActionId,
        effect: Effect,
        time: DateTime<Utc>,
    },

    ActionExecuted {
        instance: InstanceId,
        action_id: ActionId,
        effect: Effect,
    },

    /// An action failed during the execution pipeline; the drain stopped there.
    ActionFailed {
        instance: InstanceId,
        action_id: Option<ActionId>,
        effect: String,
        phase: TransitionPhase,
        error: String,
    },
}

/// Game lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted {
        instance: InstanceId,
        players: usize,
    },

    GameWon {
        instance: InstanceId,
        winner: Group,
        clock: Clock,
    },
}
