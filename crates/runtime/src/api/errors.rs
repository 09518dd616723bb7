//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule violations from the core, entity store failures and worker
//! coordination failures so callers can map every error onto one
//! [`ErrorKind`].
use thiserror::Error;
use tokio::sync::oneshot;

use werewolf_core::{
    ActionError, ErrorKind, ErrorSeverity, ExecuteError, GameError, InstanceId, NoteError,
    StateError, VoteError, VoteId, WinError,
};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("instance worker command channel closed")]
    CommandChannelClosed,

    #[error("instance worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("instance worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("{0} is already running")]
    InstanceExists(InstanceId),

    #[error("{0} does not exist")]
    UnknownInstance(InstanceId),

    #[error("{0} does not exist in this instance")]
    UnknownVote(VoteId),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Note(#[from] NoteError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Win(#[from] WinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl GameError for RuntimeError {
    fn kind(&self) -> ErrorKind {
        use RuntimeError::*;

        match self {
            CommandChannelClosed | ReplyChannelClosed(_) | WorkerJoin(_) | InstanceExists(_) => {
                ErrorKind::State
            }
            UnknownInstance(_) | UnknownVote(_) => ErrorKind::NotFound,
            Action(error) => error.kind(),
            Vote(error) => error.kind(),
            State(error) => error.kind(),
            Note(error) => error.kind(),
            Execute(error) => error.kind(),
            Win(error) => error.kind(),
            Repository(_) => ErrorKind::Storage,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        use RuntimeError::*;

        match self {
            CommandChannelClosed | ReplyChannelClosed(_) | WorkerJoin(_) | Repository(_) => {
                ErrorSeverity::Fatal
            }
            InstanceExists(_) | UnknownInstance(_) | UnknownVote(_) => ErrorSeverity::Validation,
            Action(error) => error.severity(),
            Vote(error) => error.severity(),
            State(error) => error.severity(),
            Note(error) => error.severity(),
            Execute(error) => error.severity(),
            Win(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use RuntimeError::*;

        match self {
            CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            InstanceExists(_) => "RUNTIME_INSTANCE_EXISTS",
            UnknownInstance(_) => "RUNTIME_UNKNOWN_INSTANCE",
            UnknownVote(_) => "RUNTIME_UNKNOWN_VOTE",
            Action(error) => error.error_code(),
            Vote(error) => error.error_code(),
            State(error) => error.error_code(),
            Note(error) => error.error_code(),
            Execute(error) => error.error_code(),
            Win(error) => error.error_code(),
            Repository(_) => "RUNTIME_STORAGE",
        }
    }
}
