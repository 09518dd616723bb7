use crate::error::{ErrorKind, ErrorSeverity, GameError};
use crate::location::HouseError;
use crate::note::NoteError;
use crate::role::Purpose;
use crate::state::{LocationId, PlayerIdentifier, UserId};

/// Errors raised by instance-level bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("{0} does not exist in this instance")]
    UnknownPlayer(PlayerIdentifier),

    #[error("{0} does not exist in this instance")]
    UnknownLocation(LocationId),

    #[error("{0} is already alive")]
    PlayerAlreadyAlive(PlayerIdentifier),

    #[error("user {0} already joined this instance")]
    PlayerAlreadyJoined(UserId),

    #[error("{player} already holds {purpose}")]
    DuplicatePurpose {
        player: PlayerIdentifier,
        purpose: Purpose,
    },

    #[error("only the game master may do this")]
    NoPermission,

    #[error("at least {required} players are needed, found {actual}")]
    NotEnoughPlayers { required: usize, actual: usize },

    #[error("at most {max} players are allowed, found {actual}")]
    TooManyPlayers { max: usize, actual: usize },

    #[error("{roles} roles cannot be divided over {players} players")]
    NotEnoughRoles { roles: usize, players: usize },

    #[error("the game has already started")]
    GameAlreadyStarted,

    #[error("the game has not started yet")]
    GameNotStarted,

    #[error("the game has already ended")]
    GameEnded,

    #[error(transparent)]
    House(#[from] HouseError),

    #[error(transparent)]
    Note(#[from] NoteError),
}

impl GameError for StateError {
    fn kind(&self) -> ErrorKind {
        use StateError::*;

        match self {
            UnknownPlayer(_) | UnknownLocation(_) => ErrorKind::NotFound,
            NoPermission => ErrorKind::Permission,
            DuplicatePurpose { .. } | NotEnoughPlayers { .. } | TooManyPlayers { .. } => {
                ErrorKind::Validation
            }
            PlayerAlreadyAlive(_) | PlayerAlreadyJoined(_) | NotEnoughRoles { .. }
            | GameAlreadyStarted | GameNotStarted | GameEnded => ErrorKind::State,
            House(error) => error.kind(),
            Note(error) => error.kind(),
        }
    }

    fn severity(&self) -> ErrorSeverity {
        use StateError::*;

        match self {
            NotEnoughRoles { .. } => ErrorSeverity::Internal,
            GameNotStarted | NotEnoughPlayers { .. } => ErrorSeverity::Recoverable,
            House(error) => error.severity(),
            Note(error) => error.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;

        match self {
            UnknownPlayer(_) => "STATE_UNKNOWN_PLAYER",
            UnknownLocation(_) => "STATE_UNKNOWN_LOCATION",
            PlayerAlreadyAlive(_) => "STATE_PLAYER_ALREADY_ALIVE",
            PlayerAlreadyJoined(_) => "STATE_PLAYER_ALREADY_JOINED",
            DuplicatePurpose { .. } => "STATE_DUPLICATE_PURPOSE",
            NoPermission => "STATE_NO_PERMISSION",
            NotEnoughPlayers { .. } => "STATE_NOT_ENOUGH_PLAYERS",
            TooManyPlayers { .. } => "STATE_TOO_MANY_PLAYERS",
            NotEnoughRoles { .. } => "STATE_NOT_ENOUGH_ROLES",
            GameAlreadyStarted => "STATE_GAME_ALREADY_STARTED",
            GameNotStarted => "STATE_GAME_NOT_STARTED",
            GameEnded => "STATE_GAME_ENDED",
            House(error) => error.error_code(),
            Note(error) => error.error_code(),
        }
    }
}
