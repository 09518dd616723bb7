//! Deterministic rules of the werewolf game.
//!
//! `werewolf-core` defines the canonical rules (roles, abilities, effects,
//! votes, win detection) and exposes pure APIs the runtime drives. Queued and
//! immediate effects mutate an instance only through [`engine::RulesEngine`];
//! ability use enters through [`role::perform_action`].
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod location;
pub mod note;
pub mod role;
pub mod state;
pub mod vote;
pub mod win;

pub use action::{
    Action, ActionArgs, ActionRecord, ActionStatus, Effect, KillCause, PlannedAction,
    PreActionData, Timing,
};
pub use config::{GameConfig, PhaseSchedule};
pub use engine::{ExecuteError, RulesEngine, TransitionPhase, TransitionPhaseError};
pub use error::{ErrorContext, ErrorKind, ErrorSeverity, GameError};
pub use location::{House, HouseError, HouseMethod, HouseState, Location, LocationKind};
pub use note::{Deathnote, NoteError};
pub use role::{
    AbilityInfo, ActionError, CharacterType, DoubleRole, Eligible, Group, Item, ItemCounters, Job,
    MainRole, Purpose,
};
pub use state::{
    ActionId, ActionMessage, Clock, DayPhase, GameStatus, InstanceId, InstanceState, LocationId,
    MessageKind, Player, PlayerFlags, PlayerIdentifier, StateError, UserId, VoteId,
};
pub use vote::{Ballot, SubmitOutcome, Tally, Vote, VoteError, VoteRecord, VoteResolution, VoteType};
pub use win::{WinChain, WinError};
