//! Action domain: ability tags, queued records and the effects they run.
//!
//! # Module Structure
//!
//! - `kind`: [`Action`] tags naming what a purpose can do
//! - `record`: payloads, planned actions and stored [`ActionRecord`]s
//! - `effect`: executable effects and their transitions

pub mod effect;
mod kind;
mod record;

pub use effect::{Effect, EffectContext, EffectError, EffectTransition, KillCause};
pub use kind::Action;
pub use record::{ActionArgs, ActionRecord, ActionStatus, PlannedAction, PreActionData, Timing};
