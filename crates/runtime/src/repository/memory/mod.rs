//! In-memory entity store for tests and local runs.

mod action;
mod instance;
mod vote;

pub use action::InMemoryActionRepo;
pub use instance::InMemoryInstanceRepo;
pub use vote::InMemoryVoteRepo;
