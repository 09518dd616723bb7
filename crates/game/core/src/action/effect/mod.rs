//! Executable effects scheduled by abilities, votes and phase steps.
//!
//! An [`Effect`] is the behavior half of an action record. Each variant maps to
//! a transition type implementing [`EffectTransition`]; the rules engine runs
//! it through the pre_validate → apply → post_validate pipeline against the
//! record's payload.

mod care;
mod house;
mod inspect;
mod kill;
mod movement;
mod office;

pub use care::{HealPlayer, ProtectPlayers, RevivePlayers};
pub use house::{BurnHouse, CleanHouse, SoakHouse};
pub use inspect::{SeeCharacter, SeeRole};
pub use kill::{KillMarkedPlayers, KillPlayers};
pub use movement::MoveToLocation;
pub use office::{ChangeRole, MayorDecide, NewMayor};

use chrono::{DateTime, Utc};

use crate::action::{ActionArgs, PreActionData};
use crate::error::{ErrorKind, ErrorSeverity, GameError};
use crate::location::HouseError;
use crate::state::{ActionId, InstanceState, LocationId, PlayerIdentifier, StateError};

/// Which kill step a [`Effect::KillMarkedPlayers`] belongs to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum KillCause {
    Night,
    Lynch,
}

#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Effect {
    /// Marks listed players and everyone visiting listed locations.
    KillPlayers,
    SeeRole,
    SeeCharacter,
    /// Actor takes over the main role of `players[0]`.
    ChangeRole,
    ProtectPlayers,
    HealPlayer,
    RevivePlayers,
    MoveToLocation,
    NewMayor,
    MayorDecide,
    KillMarkedPlayers(KillCause),
    SoakHouse,
    BurnHouse,
    CleanHouse,
    /// Children run in registration order with the parent's payload.
    Composite(Vec<Effect>),
}

impl Effect {
    /// Expands composites depth-first into their leaf effects.
    pub fn into_leaves(self) -> Vec<Effect> {
        match self {
            Effect::Composite(children) => children
                .into_iter()
                .flat_map(Effect::into_leaves)
                .collect(),
            leaf => vec![leaf],
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Effect::Composite(_))
    }
}

/// Inputs shared by every effect transition.
#[derive(Clone, Copy, Debug)]
pub struct EffectContext<'a> {
    pub payload: &'a PreActionData,
    pub time: DateTime<Utc>,
    pub action_id: Option<ActionId>,
}

impl<'a> EffectContext<'a> {
    pub fn new(payload: &'a PreActionData, time: DateTime<Utc>, action_id: Option<ActionId>) -> Self {
        Self {
            payload,
            time,
            action_id,
        }
    }

    pub fn actor(&self) -> PlayerIdentifier {
        self.payload.actor
    }

    pub fn args(&self) -> &'a ActionArgs {
        &self.payload.args
    }

    /// First listed player, required by single-target effects.
    pub fn first_player(&self) -> Result<PlayerIdentifier, EffectError> {
        self.args()
            .players
            .first()
            .copied()
            .ok_or(EffectError::MissingTarget)
    }

    pub fn first_location(&self) -> Result<LocationId, EffectError> {
        self.args()
            .locations
            .first()
            .copied()
            .ok_or(EffectError::MissingTarget)
    }
}

/// Defines how one effect mutates instance state.
///
/// Validation hooks receive read-only state and must not mutate anything;
/// `apply` may assume `pre_validate` succeeded.
pub trait EffectTransition {
    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(
        &self,
        _state: &InstanceState,
        _ctx: &EffectContext<'_>,
    ) -> Result<(), EffectError> {
        Ok(())
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(
        &self,
        _state: &InstanceState,
        _ctx: &EffectContext<'_>,
    ) -> Result<(), EffectError> {
        Ok(())
    }
}

/// Checks that every listed player exists.
pub(crate) fn require_players(state: &InstanceState, players: &[PlayerIdentifier]) -> Result<(), EffectError> {
    match players.iter().find(|id| state.player(**id).is_none()) {
        Some(missing) => Err(EffectError::UnknownPlayer(*missing)),
        None => Ok(()),
    }
}

/// Checks that every listed location exists.
pub(crate) fn require_locations(state: &InstanceState, locations: &[LocationId]) -> Result<(), EffectError> {
    match locations.iter().find(|id| state.location(**id).is_none()) {
        Some(missing) => Err(EffectError::UnknownLocation(*missing)),
        None => Ok(()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectError {
    #[error("{0} does not exist in this instance")]
    UnknownPlayer(PlayerIdentifier),

    #[error("{0} does not exist in this instance")]
    UnknownLocation(LocationId),

    #[error("the effect requires a target but none was given")]
    MissingTarget,

    #[error("{0} is not a house")]
    NotAHouse(LocationId),

    #[error("{0} has no main role")]
    NoMainRole(PlayerIdentifier),

    #[error(transparent)]
    House(#[from] HouseError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for EffectError {
    fn kind(&self) -> ErrorKind {
        match self {
            EffectError::UnknownPlayer(_) | EffectError::UnknownLocation(_) => ErrorKind::NotFound,
            EffectError::MissingTarget | EffectError::NotAHouse(_) => ErrorKind::Validation,
            EffectError::NoMainRole(_) => ErrorKind::State,
            EffectError::House(error) => error.kind(),
            EffectError::State(error) => error.kind(),
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            EffectError::House(error) => error.severity(),
            EffectError::State(error) => error.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EffectError::UnknownPlayer(_) => "EFFECT_UNKNOWN_PLAYER",
            EffectError::UnknownLocation(_) => "EFFECT_UNKNOWN_LOCATION",
            EffectError::MissingTarget => "EFFECT_MISSING_TARGET",
            EffectError::NotAHouse(_) => "EFFECT_NOT_A_HOUSE",
            EffectError::NoMainRole(_) => "EFFECT_NO_MAIN_ROLE",
            EffectError::House(error) => error.error_code(),
            EffectError::State(error) => error.error_code(),
        }
    }
}
