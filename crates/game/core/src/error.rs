//! Common error infrastructure for werewolf-core.
//!
//! Domain-specific errors (e.g. `VoteError`, `HouseError`) live next to the
//! rules they enforce. This module provides the shared classification every
//! one of them implements so callers can map failures without matching on
//! concrete types.
//!
//! # Design Principles
//!
//! - **Type Safety**: each subsystem has its own error enum with specific variants
//! - **Kind Classification**: errors map onto a small, transport-agnostic taxonomy
//! - **Severity Classification**: errors are categorized for recovery strategies

use crate::state::{InstanceId, PlayerIdentifier};

/// Abstract failure category surfaced to the transport layer.
///
/// Every error in the crate maps onto exactly one kind; the transport layer
/// decides which response code each kind becomes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ErrorKind {
    /// Actor lacks the ability or the right to vote.
    Permission,
    /// Operation is illegal in the current state (house state, vote lifecycle, game lifecycle).
    State,
    /// Referenced action, vote, role, instance or player does not exist.
    NotFound,
    /// Malformed input, content too long, duplicate purpose.
    Validation,
    /// Forged ballot, double vote, cut-off chain.
    Integrity,
    /// Failure of the entity store collaborator. Never produced by the core itself.
    Storage,
}

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (e.g. next phase)
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: the request cannot be served at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Instance the failing operation belonged to.
    pub instance: Option<InstanceId>,

    /// Player that triggered the error (if applicable).
    pub actor: Option<PlayerIdentifier>,

    /// Optional static message providing additional context.
    #[cfg_attr(feature = "serde", serde(skip_deserializing))]
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instance: None,
            actor: None,
            message: None,
        }
    }

    /// Attaches the owning instance (builder pattern).
    #[must_use]
    pub const fn with_instance(mut self, instance: InstanceId) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Attaches an actor to this context; also records its instance.
    #[must_use]
    pub const fn with_actor(mut self, actor: PlayerIdentifier) -> Self {
        self.instance = Some(actor.instance);
        self.actor = Some(actor);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all werewolf-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Every error carries a human-readable message via `Display`
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the abstract failure category.
    fn kind(&self) -> ErrorKind;

    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
