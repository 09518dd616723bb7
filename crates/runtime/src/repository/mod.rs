//! Entity store for data that changes during play.
//!
//! - Instance snapshots (players, houses, clock)
//! - The pending action queue
//! - Votes and their ballots
//!
//! The in-memory implementations back tests and single-process runs; the
//! file repositories keep instance snapshots and action queues across
//! restarts.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::{FileActionRepository, FileInstanceRepository};
pub use memory::{InMemoryActionRepo, InMemoryInstanceRepo, InMemoryVoteRepo};
pub use traits::{ActionRepository, InstanceRepository, VoteRepository};
