//! Worker tasks that back the runtime orchestration.
//!
//! Every game instance gets its own worker task; the services it drives
//! are shared across workers.

mod instance;

pub use instance::{Command, InstanceWorker, WorkerServices};
