//! Topic-based event bus for runtime events.
//!
//! Every instance owns a bus; consumers subscribe only to the topics they
//! need. Publishing never blocks the worker and events without subscribers
//! are dropped.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ActionEvent, GameEvent, PhaseEvent, VoteEvent};
