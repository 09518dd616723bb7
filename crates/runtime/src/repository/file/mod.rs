//! File-backed entity store.

mod action;
mod instance;

pub use action::FileActionRepository;
pub use instance::FileInstanceRepository;
