//! Roles, jobs and the abilities they grant.
//!
//! # Module Structure
//!
//! - `catalog`: main roles, double roles and jobs with their static traits
//! - `purpose`: [`Purpose`], the common view over all three
//! - `item`: consumable ability counters
//! - `abilities`: per-purpose validation, information and replenishment
//! - `dispatch`: entry points used by the runtime

mod abilities;
mod catalog;
mod dispatch;
pub mod error;
mod item;
mod purpose;

pub use abilities::{AbilityInfo, Eligible};
pub use catalog::{CharacterType, DoubleRole, Group, Job, MainRole};
pub use dispatch::{information, perform_action, replenish_all};
pub use error::ActionError;
pub use item::{Item, ItemCounters};
pub use purpose::Purpose;
