//! Execution context provided to hooks during a phase advance.

use chrono::{DateTime, Utc};
use tracing::info;

use werewolf_core::{
    ActionArgs, ActionId, Effect, GameConfig, InstanceState, KillCause, PlannedAction,
    PreActionData, VoteId, VoteRecord, VoteType, vote,
};

use crate::api::Result;
use crate::events::{EventBus, VoteEvent};
use crate::services::{ActionManager, VoteService};

/// Mutable view of one instance plus the shared services, handed to every
/// hook of a phase advance.
pub struct HookContext<'a> {
    pub state: &'a mut InstanceState,
    pub config: &'a GameConfig,
    pub actions: &'a ActionManager,
    pub votes: &'a VoteService,
    pub events: &'a EventBus,
    /// Wall clock time of the advance; game master actions are stamped with it.
    pub now: DateTime<Utc>,
}

impl<'a> HookContext<'a> {
    pub fn new(
        state: &'a mut InstanceState,
        config: &'a GameConfig,
        actions: &'a ActionManager,
        votes: &'a VoteService,
        events: &'a EventBus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            state,
            config,
            actions,
            votes,
            events,
            now,
        }
    }

    /// Runs every pending action of the instance.
    pub async fn drain(&mut self) -> Result<usize> {
        let executed = self.actions.drain(self.state, self.events).await?;
        Ok(executed.len())
    }

    pub fn enqueue(&mut self, plans: Vec<PlannedAction>) -> Result<Vec<ActionId>> {
        let records = self.actions.enqueue(self.state, plans, self.events)?;
        Ok(records.into_iter().map(|record| record.id).collect())
    }

    /// Queues the game master's kill of every marked player and runs it.
    pub async fn kill_marked(&mut self, cause: KillCause) -> Result<()> {
        let marked = self.state.marked_ids();
        if marked.is_empty() {
            return Ok(());
        }
        info!(
            target: "runtime::hooks",
            instance = %self.state.id,
            cause = ?cause,
            victims = marked.len(),
            "Killing marked players"
        );
        let kill = PlannedAction::queued(
            self.now,
            Effect::KillMarkedPlayers(cause),
            PreActionData::new(self.state.game_master_id(), ActionArgs::players(marked)),
        );
        self.enqueue(vec![kill])?;
        self.drain().await?;
        Ok(())
    }

    /// Opens a vote of `vote_type` and announces it.
    pub fn start_vote(&mut self, vote_type: VoteType) -> Result<Option<VoteRecord>> {
        let Some(record) = self.votes.open(self.state, vote_type)? else {
            return Ok(None);
        };
        self.events.publish(VoteEvent::VoteStarted {
            instance: self.state.id,
            vote: record.id,
            vote_type,
            allowed: record.allowed().iter().copied().collect(),
        });
        Ok(Some(record))
    }

    /// Ends a vote and applies its result.
    ///
    /// Plans produced by the result are queued, not drained. A split alpha
    /// wolf vote opens a new vote of the same type.
    pub async fn end_vote(&mut self, id: VoteId, forced: bool) -> Result<()> {
        let (record, tally) = self.votes.close(self.state.id, id).await?;
        self.events.publish(VoteEvent::VoteEnded {
            instance: self.state.id,
            vote: id,
            vote_type: record.vote_type,
            tally: tally.clone(),
            forced,
        });

        let resolution =
            vote::resolve(record.vote_type, &tally, self.state, self.config, self.now)?;
        self.enqueue(resolution.plans)?;
        if resolution.reelection {
            self.start_vote(record.vote_type)?;
        }
        Ok(())
    }

    /// Ends every ongoing vote of `vote_type`.
    pub async fn end_votes(&mut self, vote_type: VoteType) -> Result<usize> {
        let ongoing = self.votes.ongoing_of(self.state.id, vote_type)?;
        for record in &ongoing {
            self.end_vote(record.id, false).await?;
        }
        Ok(ongoing.len())
    }
}
