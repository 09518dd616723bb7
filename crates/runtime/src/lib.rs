//! Runtime orchestration for werewolf game instances.
//!
//! This crate wires the rules of `werewolf-core` together with repositories,
//! the pending action queue, votes and one worker task per instance into a
//! cohesive runtime API. Consumers embed [`Runtime`] to create instances and
//! drive them through [`InstanceHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`hooks`] holds the steps run on every phase advance
//! - [`services`] holds the action queue and the vote lifecycle
//! - [`repository`] provides storage adapters
//! - [`config`] and [`logging`] set up the process around the runtime
pub mod api;
pub mod config;
pub mod events;
pub mod hooks;
pub mod logging;
pub mod repository;
pub mod roles;
pub mod runtime;
pub mod services;

mod workers;

pub use api::{InstanceHandle, Result, RuntimeError};
pub use config::RuntimeConfig;
pub use events::{ActionEvent, Event, EventBus, GameEvent, PhaseEvent, Topic, VoteEvent};
pub use hooks::{HookContext, HookCriticality, HookRegistry, PhaseHook};
pub use logging::{LoggingError, setup_logging};
pub use repository::{
    ActionRepository, FileActionRepository, FileInstanceRepository, InMemoryActionRepo,
    InMemoryInstanceRepo, InMemoryVoteRepo, InstanceRepository, RepositoryError, VoteRepository,
};
pub use roles::RoleDivision;
pub use runtime::{InstanceSetup, Runtime, RuntimeBuilder};
pub use services::{ActionManager, VoteService};
