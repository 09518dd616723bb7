//! Services shared by every instance worker.
//!
//! - [`ActionManager`]: pending action queue and its time-ordered drain
//! - [`VoteService`]: vote lifecycle and ballot validation
mod actions;
mod votes;

pub use actions::ActionManager;
pub use votes::VoteService;
