//! Phase hook system for runtime orchestration.
//!
//! Every phase advance runs the registered hooks of the phase just entered.
//! Hooks drive the game through the same services players use: they drain
//! the action queue, enqueue game master actions and open or close votes.
//!
//! # Architecture
//!
//! - Hooks are registered in the RuntimeBuilder and sorted by priority
//! - After the clock advances, hooks whose `should_trigger()` accepts the new
//!   clock run in priority order
//! - Hooks only run once the first in-game day has begun
//! - Win detection runs after the hooks, outside the registry
//!
//! # Default hooks
//!
//! | Phase     | Hooks                                                  |
//! |-----------|--------------------------------------------------------|
//! | DAY       | `NightKillHook`, `DawnHook`, `ElectionHook`            |
//! | VOTE      | `LynchOpeningHook`                                     |
//! | EXECUTION | `LynchClosingHook`                                     |
//! | EVENING   | `LynchKillHook`, `ReplenishHook`                       |
//! | NIGHT     | `NightfallHook`                                        |

mod context;
mod day;
mod evening;
mod night;
mod registry;
mod vote;

pub use context::HookContext;
pub use day::{DawnHook, ElectionHook, NightKillHook};
pub use evening::{LynchKillHook, ReplenishHook};
pub use night::NightfallHook;
pub use registry::HookRegistry;
pub use vote::{LynchClosingHook, LynchOpeningHook};

use async_trait::async_trait;

use werewolf_core::Clock;

use crate::api::Result;

/// Defines the criticality level of a hook for error handling.
///
/// - Critical hooks must succeed or the phase advance fails
/// - Important hooks log errors but allow continuation
/// - Optional hooks can fail silently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCriticality {
    /// Hook failure fails the phase advance.
    ///
    /// Use for hooks that resolve kills or votes. Steps already applied
    /// before the failure stay applied.
    Critical,

    /// Hook failure is logged as error, the remaining hooks still run.
    Important,

    /// Hook failure is logged at debug level.
    Optional,
}

/// Step run when the clock enters a phase.
///
/// Hooks are sorted by priority (lower values execute first):
/// - Negative priorities: kill resolution that must see the queue first
/// - Zero: default priority for most hooks
/// - Positive priorities: hooks that depend on the outcome of the others
#[async_trait]
pub trait PhaseHook: Send + Sync {
    /// Returns a human-readable name for this hook (used in logging and debugging).
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    /// Whether the hook runs for the clock just entered.
    fn should_trigger(&self, clock: Clock) -> bool;

    async fn run(&self, ctx: &mut HookContext<'_>) -> Result<()>;
}
