use crate::error::{ErrorKind, ErrorSeverity, GameError};
use crate::state::{LocationId, PlayerIdentifier};

pub const MUST_BE_ALIVE: &str = "You must be alive to perform this action.";
pub const NO_ACTIONS_LEFT: &str = "You do not have any of these actions left";
pub const ACTION_DOES_NOT_EXIST: &str = "That action does not exist!";
pub const SELECT_ONE_PLAYER: &str = "You can only select 1 player for this action!";
pub const SELECT_ONE_LOCATION: &str = "You can only select 1 player's location for this action!";
pub const TARGET_STILL_ALIVE: &str = "This player is still alive!";
pub const WRONG_AMOUNT_OF_INPUTS: &str = "The action received the wrong amount of inputs";
pub const SUCCESSOR_ALREADY_CHOSEN: &str = "You have already chosen a successor!";
pub const WRONG_INPUT: &str = "Wrong input for this action";
pub const NO_UNDECIDED_LYNCHES: &str = "There are no undecided lynches at the moment!";
pub const NOT_A_HOUSE: &str = "You can only select a house for this action!";
pub const NOT_GRANTED: &str = "None of your roles or jobs can perform this action";

/// Rejection of an ability invocation.
///
/// Each purpose re-validates its own preconditions; the message names the
/// first check that failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// No purpose of the actor grants the ability.
    #[error("{0}")]
    NoPermission(&'static str),

    #[error("{0}")]
    NotAllowedToPerformAction(&'static str),

    #[error("{0}")]
    NoSuchAction(&'static str),

    #[error("{0}")]
    WrongInput(&'static str),

    #[error("{0} does not exist in this instance")]
    NoSuchPlayer(PlayerIdentifier),

    #[error("{0} does not exist in this instance")]
    NoSuchLocation(LocationId),

    #[error("abilities can only be used while the game is running")]
    GameNotRunning,
}

impl GameError for ActionError {
    fn kind(&self) -> ErrorKind {
        use ActionError::*;

        match self {
            NoPermission(_) | NotAllowedToPerformAction(_) => ErrorKind::Permission,
            NoSuchAction(_) | NoSuchPlayer(_) | NoSuchLocation(_) => ErrorKind::NotFound,
            WrongInput(_) => ErrorKind::Validation,
            GameNotRunning => ErrorKind::State,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;

        match self {
            NotAllowedToPerformAction(_) | GameNotRunning => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;

        match self {
            NoPermission(_) => "ACTION_NO_PERMISSION",
            NotAllowedToPerformAction(_) => "ACTION_NOT_ALLOWED",
            NoSuchAction(_) => "ACTION_NO_SUCH_ACTION",
            WrongInput(_) => "ACTION_WRONG_INPUT",
            NoSuchPlayer(_) => "ACTION_NO_SUCH_PLAYER",
            NoSuchLocation(_) => "ACTION_NO_SUCH_LOCATION",
            GameNotRunning => "ACTION_GAME_NOT_RUNNING",
        }
    }
}
