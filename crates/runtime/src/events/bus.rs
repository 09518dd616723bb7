//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{ActionEvent, GameEvent, PhaseEvent, VoteEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Phase transitions
    Phase,
    /// Vote lifecycle and ballots
    Vote,
    /// Queued, executed and failed actions
    Action,
    /// Game start and end
    Game,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Phase, Topic::Vote, Topic::Action, Topic::Game];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Phase(PhaseEvent),
    Vote(VoteEvent),
    Action(ActionEvent),
    Game(GameEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Phase(_) => Topic::Phase,
            Event::Vote(_) => Topic::Vote,
            Event::Action(_) => Topic::Action,
            Event::Game(_) => Topic::Game,
        }
    }
}

impl From<PhaseEvent> for Event {
    fn from(event: PhaseEvent) -> Self {
        Event::Phase(event)
    }
}

impl From<VoteEvent> for Event {
    fn from(event: VoteEvent) -> Self {
        Event::Vote(event)
    }
}

impl From<ActionEvent> for Event {
    fn from(event: ActionEvent) -> Self {
        Event::Action(event)
    }
}

impl From<GameEvent> for Event {
    fn from(event: GameEvent) -> Self {
        Event::Game(event)
    }
}

struct Channels {
    phase: broadcast::Sender<Event>,
    vote: broadcast::Sender<Event>,
    action: broadcast::Sender<Event>,
    game: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Phase => &self.phase,
            Topic::Vote => &self.vote,
            Topic::Action => &self.action,
            Topic::Game => &self.game,
        }
    }
}

/// Topic-based event bus
///
/// Every topic gets its own broadcast channel at construction, so publishing
/// and subscribing never take a lock.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                phase: broadcast::channel(capacity).0,
                vote: broadcast::channel(capacity).0,
                action: broadcast::channel(capacity).0,
                game: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werewolf_core::{Clock, DayPhase, InstanceId};

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut phase_rx = bus.subscribe(Topic::Phase);
        let mut game_rx = bus.subscribe(Topic::Game);

        bus.publish(PhaseEvent::PhaseChanged {
            instance: InstanceId(1),
            clock: Clock::new(1, DayPhase::Day),
        });

        let event = phase_rx.recv().await.unwrap();
        assert_eq!(event.topic(), Topic::Phase);
        assert!(game_rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(GameEvent::GameStarted {
            instance: InstanceId(1),
            players: 3,
        });
        let receivers = bus.subscribe_multiple(&Topic::ALL);
        assert_eq!(receivers.len(), 4);
    }
}
