//! High-level runtime orchestrator.
//!
//! The runtime owns one worker per game instance, wires up command/event
//! channels, and exposes a builder-based API for clients to create and drive
//! instances.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use werewolf_core::{InstanceId, InstanceState, UserId, WinChain};

use crate::api::{InstanceHandle, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::hooks::HookRegistry;
use crate::repository::{
    ActionRepository, FileActionRepository, FileInstanceRepository, InMemoryActionRepo, InMemoryInstanceRepo,
    InMemoryVoteRepo, InstanceRepository, VoteRepository,
};
use crate::services::{ActionManager, VoteService};
use crate::workers::{InstanceWorker, WorkerServices};

/// Lobby of a new instance: its game master and the users joining right away.
#[derive(Clone, Debug)]
pub struct InstanceSetup {
    pub id: InstanceId,
    pub game_master: UserId,
    pub users: Vec<UserId>,
}

impl InstanceSetup {
    pub fn new(id: InstanceId, game_master: UserId) -> Self {
        Self {
            id,
            game_master,
            users: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_users(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.users.extend(users);
        self
    }
}

struct InstanceEntry {
    handle: InstanceHandle,
    worker: JoinHandle<()>,
}

impl InstanceEntry {
    async fn stop(self) -> Result<()> {
        self.handle.stop().await;
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Main runtime that hosts game instances
///
/// Design: Runtime owns workers and the shared services.
/// [`InstanceHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    config: Arc<RuntimeConfig>,
    services: WorkerServices,
    instances: HashMap<InstanceId, InstanceEntry>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Creates an instance in the lobby and spawns its worker.
    pub fn create_instance(&mut self, setup: InstanceSetup) -> Result<InstanceHandle> {
        if self.instances.contains_key(&setup.id) || self.services.instances.load(setup.id)?.is_some()
        {
            return Err(RuntimeError::InstanceExists(setup.id));
        }

        let mut state = InstanceState::new(setup.id, setup.game_master);
        for user in setup.users {
            state.join(user)?;
        }
        self.services.instances.save(&state)?;

        info!(
            target: "runtime",
            instance = %setup.id,
            game_master = %setup.game_master,
            players = state.player_count(),
            "Instance created"
        );
        Ok(self.spawn(state))
    }

    /// Spawns a worker for an instance stored by an earlier runtime.
    pub fn resume_instance(&mut self, id: InstanceId) -> Result<InstanceHandle> {
        if let Some(entry) = self.instances.get(&id) {
            return Ok(entry.handle.clone());
        }
        let state = self
            .services
            .instances
            .load(id)?
            .ok_or(RuntimeError::UnknownInstance(id))?;

        info!(target: "runtime", instance = %id, clock = ?state.clock, "Instance resumed");
        Ok(self.spawn(state))
    }

    fn spawn(&mut self, state: InstanceState) -> InstanceHandle {
        let id = state.id;
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let worker = InstanceWorker::new(
            state,
            Arc::clone(&self.config),
            self.services.clone(),
            command_rx,
            event_bus.clone(),
        );
        let worker = tokio::spawn(worker.run());

        let handle = InstanceHandle::new(id, command_tx, event_bus);
        self.instances.insert(
            id,
            InstanceEntry {
                handle: handle.clone(),
                worker,
            },
        );
        handle
    }

    /// Get a cloneable handle to a running instance
    pub fn instance(&self, id: InstanceId) -> Option<InstanceHandle> {
        self.instances.get(&id).map(|entry| entry.handle.clone())
    }

    /// Ids of every instance with a running worker, ascending.
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<_> = self.instances.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Stops the worker of one instance. Its snapshot stays stored, and
    /// outstanding handles of the instance fail from now on.
    pub async fn close_instance(&mut self, id: InstanceId) -> Result<()> {
        let entry = self
            .instances
            .remove(&id)
            .ok_or(RuntimeError::UnknownInstance(id))?;
        entry.stop().await
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        for (_, entry) in self.instances {
            entry.stop().await?;
        }
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    hooks: Option<HookRegistry>,
    win_chain: Option<WinChain>,
    instance_repository: Option<Arc<dyn InstanceRepository>>,
    action_repository: Option<Arc<dyn ActionRepository>>,
    vote_repository: Option<Arc<dyn VoteRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            hooks: None,
            win_chain: None,
            instance_repository: None,
            action_repository: None,
            vote_repository: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set custom phase hooks.
    ///
    /// If not provided, [`HookRegistry::default_hooks`] is used.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use std::sync::Arc;
    ///
    /// let hooks = vec![
    ///     Arc::new(NightKillHook) as Arc<dyn PhaseHook>,
    ///     Arc::new(DawnHook) as Arc<dyn PhaseHook>,
    /// ];
    ///
    /// let runtime = Runtime::builder()
    ///     .with_hooks(HookRegistry::new(hooks))
    ///     .build()
    ///     .await?;
    /// ```
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Override the faction order of win detection.
    pub fn win_chain(mut self, chain: WinChain) -> Self {
        self.win_chain = Some(chain);
        self
    }

    /// Store instance snapshots here instead of the configured default.
    pub fn instance_repository(mut self, repository: Arc<dyn InstanceRepository>) -> Self {
        self.instance_repository = Some(repository);
        self
    }

    pub fn action_repository(mut self, repository: Arc<dyn ActionRepository>) -> Self {
        self.action_repository = Some(repository);
        self
    }

    pub fn vote_repository(mut self, repository: Arc<dyn VoteRepository>) -> Self {
        self.vote_repository = Some(repository);
        self
    }

    /// Build the runtime.
    ///
    /// Instance snapshots and action records go to `config.snapshot_dir`
    /// when set, otherwise they are kept in memory. Votes are always kept in
    /// memory unless a repository is given.
    pub async fn build(self) -> Result<Runtime> {
        let instances: Arc<dyn InstanceRepository> = match self.instance_repository {
            Some(repository) => repository,
            None => match &self.config.snapshot_dir {
                Some(dir) => Arc::new(FileInstanceRepository::new(dir)?),
                None => Arc::new(InMemoryInstanceRepo::new()),
            },
        };
        let actions: Arc<dyn ActionRepository> = match self.action_repository {
            Some(repository) => repository,
            None => match &self.config.snapshot_dir {
                Some(dir) => Arc::new(FileActionRepository::new(dir.join("actions"))?),
                None => Arc::new(InMemoryActionRepo::new()),
            },
        };
        let votes = self
            .vote_repository
            .unwrap_or_else(|| Arc::new(InMemoryVoteRepo::new()) as Arc<dyn VoteRepository>);

        let hooks = self.hooks.unwrap_or_default();
        info!(
            target: "runtime",
            hooks = hooks.len(),
            snapshots = ?self.config.snapshot_dir,
            "Runtime built"
        );

        let services = WorkerServices {
            instances,
            actions: Arc::new(ActionManager::resume(actions)?),
            votes: Arc::new(VoteService::new(votes)),
            hooks: Arc::new(hooks),
            win_chain: Arc::new(self.win_chain.unwrap_or_default()),
        };

        Ok(Runtime {
            config: Arc::new(self.config),
            services,
            instances: HashMap::new(),
        })
    }
}
