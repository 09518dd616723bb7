//! Instance worker that owns the authoritative [`InstanceState`] of one game.
//!
//! Receives commands from [`crate::InstanceHandle`], runs abilities, ballots
//! and phase advances through the shared services, and publishes events to
//! the instance's [`EventBus`]. One worker serves one instance, so commands
//! of an instance never interleave.

use std::sync::Arc;

use chrono::{Local, Timelike, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use werewolf_core::{
    AbilityInfo, Action, ActionArgs, ActionId, Ballot, Clock, GameStatus, Group, InstanceState,
    PlayerIdentifier, StateError, SubmitOutcome, UserId, VoteId, VoteRecord, WinChain, role,
};

use crate::api::Result;
use crate::config::RuntimeConfig;
use crate::events::{EventBus, GameEvent, PhaseEvent, VoteEvent};
use crate::hooks::{HookContext, HookRegistry};
use crate::repository::InstanceRepository;
use crate::roles::RoleDivision;
use crate::services::{ActionManager, VoteService};

/// Commands that can be sent to an instance worker.
pub enum Command {
    /// Add a user to the lobby.
    Join {
        user: UserId,
        reply: oneshot::Sender<Result<PlayerIdentifier>>,
    },
    /// Divide roles, start the game and enter the opening phase.
    StartGame {
        caller: UserId,
        reply: oneshot::Sender<Result<Clock>>,
    },
    /// Use an ability.
    PerformAction {
        actor: PlayerIdentifier,
        action: Action,
        args: ActionArgs,
        reply: oneshot::Sender<Result<Vec<ActionId>>>,
    },
    /// Abilities the player can use right now.
    Information {
        actor: PlayerIdentifier,
        reply: oneshot::Sender<Result<Vec<AbilityInfo>>>,
    },
    SubmitBallot {
        vote: VoteId,
        caller: PlayerIdentifier,
        ballot: Ballot,
        reply: oneshot::Sender<Result<SubmitOutcome>>,
    },
    UpdateDeathnote {
        player: PlayerIdentifier,
        content: String,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Move the clock to the next phase and run its steps.
    AdvancePhase { reply: oneshot::Sender<Result<Clock>> },
    /// Discard every pending action.
    ClearActions { reply: oneshot::Sender<Result<usize>> },
    /// Started votes that have not ended.
    OngoingVotes {
        reply: oneshot::Sender<Result<Vec<VoteRecord>>>,
    },
    /// Query the current instance state (read-only).
    QueryState {
        reply: oneshot::Sender<InstanceState>,
    },
    /// Stop the worker; later commands fail with a closed channel.
    Shutdown,
}

/// Services a worker drives its instance through; shared by every worker
/// of one runtime.
#[derive(Clone)]
pub struct WorkerServices {
    pub instances: Arc<dyn InstanceRepository>,
    pub actions: Arc<ActionManager>,
    pub votes: Arc<VoteService>,
    pub hooks: Arc<HookRegistry>,
    pub win_chain: Arc<WinChain>,
}

/// Background task that processes the commands of one instance.
pub struct InstanceWorker {
    state: InstanceState,
    config: Arc<RuntimeConfig>,
    services: WorkerServices,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl InstanceWorker {
    pub fn new(
        state: InstanceState,
        config: Arc<RuntimeConfig>,
        services: WorkerServices,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        debug!(
            target: "runtime::worker",
            instance = %state.id,
            players = state.player_count(),
            "InstanceWorker initialized"
        );
        Self {
            state,
            config,
            services,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if matches!(cmd, Command::Shutdown) {
                        break;
                    }
                    self.handle_command(cmd).await;
                }
                else => break,
            }
        }
        self.services.actions.release(self.state.id);
        debug!(target: "runtime::worker", instance = %self.state.id, "InstanceWorker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Join { user, reply } => {
                let result = self.handle_join(user);
                if reply.send(result).is_err() {
                    debug!("Join reply channel closed (caller dropped)");
                }
            }
            Command::StartGame { caller, reply } => {
                let result = self.handle_start_game(caller).await;
                if reply.send(result).is_err() {
                    debug!("StartGame reply channel closed (caller dropped)");
                }
            }
            Command::PerformAction {
                actor,
                action,
                args,
                reply,
            } => {
                let result = self.handle_perform_action(actor, action, args);
                if reply.send(result).is_err() {
                    debug!("PerformAction reply channel closed (caller dropped)");
                }
            }
            Command::Information { actor, reply } => {
                let result = self.handle_information(actor);
                if reply.send(result).is_err() {
                    debug!("Information reply channel closed (caller dropped)");
                }
            }
            Command::SubmitBallot {
                vote,
                caller,
                ballot,
                reply,
            } => {
                let result = self.handle_submit_ballot(vote, caller, ballot).await;
                if reply.send(result).is_err() {
                    debug!("SubmitBallot reply channel closed (caller dropped)");
                }
            }
            Command::UpdateDeathnote {
                player,
                content,
                reply,
            } => {
                let result = self.handle_update_deathnote(player, content);
                if reply.send(result).is_err() {
                    debug!("UpdateDeathnote reply channel closed (caller dropped)");
                }
            }
            Command::AdvancePhase { reply } => {
                let result = self.handle_advance_phase().await;
                if reply.send(result).is_err() {
                    debug!("AdvancePhase reply channel closed (caller dropped)");
                }
            }
            Command::ClearActions { reply } => {
                let result = self.services.actions.clear(self.state.id).await;
                if reply.send(result).is_err() {
                    debug!("ClearActions reply channel closed (caller dropped)");
                }
            }
            Command::OngoingVotes { reply } => {
                let result = self.services.votes.ongoing(self.state.id);
                if reply.send(result).is_err() {
                    debug!("OngoingVotes reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => {}
        }
    }

    fn persist(&self) -> Result<()> {
        self.services.instances.save(&self.state)?;
        Ok(())
    }

    fn handle_join(&mut self, user: UserId) -> Result<PlayerIdentifier> {
        if self.state.status != GameStatus::Lobby {
            return Err(StateError::GameAlreadyStarted.into());
        }
        let player = self.state.join(user)?;
        self.persist()?;
        Ok(player)
    }

    async fn handle_start_game(&mut self, caller: UserId) -> Result<Clock> {
        let players = self.state.player_count();
        let seed = self
            .config
            .role_seed
            .wrapping_add(u64::from(self.state.id.0));
        let roles = RoleDivision::for_players(players).draw(seed);
        let minute = self.config.opening_minute.unwrap_or_else(|| {
            let now = Local::now();
            now.hour() * 60 + now.minute()
        });

        self.state
            .start_game(caller, roles, minute, &self.config.game)?;
        info!(
            target: "runtime::worker",
            instance = %self.state.id,
            players,
            opening_minute = minute,
            "Game started"
        );
        self.event_bus.publish(GameEvent::GameStarted {
            instance: self.state.id,
            players,
        });

        self.handle_advance_phase().await
    }

    /// Runs the ability on a copy and commits it only once every resulting
    /// plan was accepted by the queue.
    fn handle_perform_action(
        &mut self,
        actor: PlayerIdentifier,
        action: Action,
        args: ActionArgs,
    ) -> Result<Vec<ActionId>> {
        let now = Utc::now();
        let mut draft = self.state.clone();
        let plans = role::perform_action(&mut draft, &self.config.game, actor, action, &args, now)?;
        let records = self
            .services
            .actions
            .enqueue(&mut draft, plans, &self.event_bus)?;

        self.state = draft;
        self.persist()?;

        info!(
            target: "runtime::worker",
            instance = %self.state.id,
            actor = %actor,
            action = %action,
            stored = records.len(),
            "Ability accepted"
        );
        Ok(records.into_iter().map(|record| record.id).collect())
    }

    fn handle_information(&self, actor: PlayerIdentifier) -> Result<Vec<AbilityInfo>> {
        self.state.require_player(actor)?;
        Ok(role::information(&self.state, actor))
    }

    /// Stores a ballot; a ballot completing an alpha wolf vote ends it right away.
    async fn handle_submit_ballot(
        &mut self,
        vote: VoteId,
        caller: PlayerIdentifier,
        ballot: Ballot,
    ) -> Result<SubmitOutcome> {
        let instance = self.state.id;
        let outcome = self
            .services
            .votes
            .submit(instance, vote, caller, ballot)
            .await?;
        self.event_bus.publish(VoteEvent::BallotRecorded {
            instance,
            vote,
            voter: ballot.voter,
        });

        if outcome == SubmitOutcome::Unanimous {
            info!(target: "runtime::worker", instance = %instance, vote = %vote, "Vote ended early");
            let mut ctx = HookContext::new(
                &mut self.state,
                &self.config.game,
                &self.services.actions,
                &self.services.votes,
                &self.event_bus,
                Utc::now(),
            );
            ctx.end_vote(vote, true).await?;
            self.persist()?;
        }
        Ok(outcome)
    }

    fn handle_update_deathnote(&mut self, player: PlayerIdentifier, content: String) -> Result<()> {
        self.state
            .require_player_mut(player)?
            .deathnote
            .set_content(content)?;
        self.persist()
    }

    /// Advances the clock and runs the steps of the entered phase.
    ///
    /// The clock stays advanced when a critical step fails; steps applied
    /// before the failure are kept and persisted.
    async fn handle_advance_phase(&mut self) -> Result<Clock> {
        match self.state.status {
            GameStatus::Running => {}
            GameStatus::Lobby => return Err(StateError::GameNotStarted.into()),
            GameStatus::Ended { .. } => return Err(StateError::GameEnded.into()),
        }

        self.state.clock.advance();
        let clock = self.state.clock;
        info!(
            target: "runtime::worker",
            instance = %self.state.id,
            day = clock.day,
            phase = %clock.phase,
            "Phase advanced"
        );

        if clock.has_begun() {
            let mut ctx = HookContext::new(
                &mut self.state,
                &self.config.game,
                &self.services.actions,
                &self.services.votes,
                &self.event_bus,
                Utc::now(),
            );
            if let Err(error) = self.services.hooks.run_phase(&mut ctx).await {
                warn!(
                    target: "runtime::worker",
                    instance = %self.state.id,
                    error = %error,
                    "Phase steps aborted"
                );
                self.persist()?;
                return Err(error);
            }
            self.check_win().await?;
        }

        self.event_bus.publish(PhaseEvent::PhaseChanged {
            instance: self.state.id,
            clock,
        });
        self.persist()?;
        Ok(clock)
    }

    /// Ends the game once a faction has won and discards the remaining queue.
    async fn check_win(&mut self) -> Result<Option<Group>> {
        let Some(winner) = self.services.win_chain.check_win(&self.state) else {
            return Ok(None);
        };
        self.state.end_game(Some(winner));
        let discarded = self.services.actions.clear(self.state.id).await?;
        self.services.actions.release(self.state.id);

        info!(
            target: "runtime::worker",
            instance = %self.state.id,
            winner = %winner,
            day = self.state.clock.day,
            discarded,
            "Game won"
        );
        self.event_bus.publish(GameEvent::GameWon {
            instance: self.state.id,
            winner,
            clock: self.state.clock,
        });
        Ok(Some(winner))
    }
}
