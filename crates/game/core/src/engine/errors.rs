//! Error types for the effect execution pipeline.

use crate::action::EffectError;
use crate::error::{ErrorContext, ErrorKind, ErrorSeverity, GameError};
use crate::state::ActionId;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Failure of one effect while executing an action record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{effect} effect of {} failed: {source}", display_action(.action_id))]
pub struct ExecuteError {
    pub effect: &'static str,
    pub action_id: Option<ActionId>,
    pub source: TransitionPhaseError<EffectError>,
    pub context: ErrorContext,
}

fn display_action(action_id: &Option<ActionId>) -> String {
    action_id.map_or_else(|| "unsaved action".to_owned(), |id| id.to_string())
}

impl ExecuteError {
    pub fn phase(&self) -> TransitionPhase {
        self.source.phase
    }

    pub fn effect_error(&self) -> &EffectError {
        &self.source.error
    }
}

impl GameError for ExecuteError {
    fn kind(&self) -> ErrorKind {
        self.source.error.kind()
    }

    fn severity(&self) -> ErrorSeverity {
        match self.source.phase {
            TransitionPhase::PostValidate => ErrorSeverity::Internal,
            _ => self.source.error.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        Some(&self.context)
    }

    fn error_code(&self) -> &'static str {
        self.source.error.error_code()
    }
}
