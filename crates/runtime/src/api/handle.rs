//! Cloneable façade for issuing commands to one game instance.
//!
//! [`InstanceHandle`] hides channel plumbing and offers async helpers for
//! playing the game or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use werewolf_core::{
    AbilityInfo, Action, ActionArgs, ActionId, Ballot, Clock, InstanceId, InstanceState,
    PlayerIdentifier, SubmitOutcome, UserId, VoteId, VoteRecord,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with one instance worker
#[derive(Clone)]
pub struct InstanceHandle {
    instance: InstanceId,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl InstanceHandle {
    pub(crate) fn new(
        instance: InstanceId,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            instance,
            command_tx,
            event_bus,
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Add a user to the lobby
    pub async fn join(&self, user: UserId) -> Result<PlayerIdentifier> {
        self.request(|reply| Command::Join { user, reply }).await?
    }

    /// Start the game as the game master; returns the opening clock
    pub async fn start_game(&self, caller: UserId) -> Result<Clock> {
        self.request(|reply| Command::StartGame { caller, reply })
            .await?
    }

    /// Use an ability; returns the ids of the stored action records
    pub async fn perform_action(
        &self,
        actor: PlayerIdentifier,
        action: Action,
        args: ActionArgs,
    ) -> Result<Vec<ActionId>> {
        self.request(|reply| Command::PerformAction {
            actor,
            action,
            args,
            reply,
        })
        .await?
    }

    /// Abilities the player can use right now, with their eligible targets
    pub async fn information(&self, actor: PlayerIdentifier) -> Result<Vec<AbilityInfo>> {
        self.request(|reply| Command::Information { actor, reply })
            .await?
    }

    pub async fn submit_ballot(
        &self,
        vote: VoteId,
        caller: PlayerIdentifier,
        ballot: Ballot,
    ) -> Result<SubmitOutcome> {
        self.request(|reply| Command::SubmitBallot {
            vote,
            caller,
            ballot,
            reply,
        })
        .await?
    }

    pub async fn update_deathnote(
        &self,
        player: PlayerIdentifier,
        content: impl Into<String>,
    ) -> Result<()> {
        let content = content.into();
        self.request(|reply| Command::UpdateDeathnote {
            player,
            content,
            reply,
        })
        .await?
    }

    /// Move to the next phase and run its steps
    pub async fn advance_phase(&self) -> Result<Clock> {
        self.request(|reply| Command::AdvancePhase { reply }).await?
    }

    /// Discard every pending action; returns how many were discarded
    pub async fn clear_actions(&self) -> Result<usize> {
        self.request(|reply| Command::ClearActions { reply }).await?
    }

    pub async fn ongoing_votes(&self) -> Result<Vec<VoteRecord>> {
        self.request(|reply| Command::OngoingVotes { reply }).await?
    }

    /// Ask the worker to stop after the commands already queued.
    pub(crate) async fn stop(&self) {
        if self.command_tx.send(Command::Shutdown).await.is_err() {
            tracing::debug!(instance = %self.instance, "Worker already stopped");
        }
    }

    /// Query the current instance state (read-only snapshot)
    pub async fn query_state(&self) -> Result<InstanceState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Phase` - Clock changes
    /// - `Topic::Vote` - Vote lifecycle and ballots
    /// - `Topic::Action` - Stored, executed and failed actions
    /// - `Topic::Game` - Game start and win
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use werewolf_runtime::Topic;
    ///
    /// let mut votes = handle.subscribe(Topic::Vote);
    /// while let Ok(event) = votes.recv().await {
    ///     // Handle vote events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
