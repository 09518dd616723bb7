//! Authoritative state of one game instance.
//!
//! [`InstanceState`] owns players, locations, the clock, succession records
//! and pending notifications. The runtime persists it as a snapshot and mutates
//! it only through the rules engine, purpose dispatch and the phase steps
//! defined here.

mod error;
mod ids;
mod message;
mod phase;
mod player;

pub use error::StateError;
pub use ids::{ActionId, InstanceId, LocationId, PlayerIdentifier, UserId, VoteId};
pub use message::{ActionMessage, MessageKind};
pub use phase::{Clock, DayPhase};
pub use player::{Player, PlayerFlags};

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::location::{HouseState, Location};
use crate::role::{Group, Job, MainRole};

/// Lifecycle of an instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    /// Players may still join.
    #[default]
    Lobby,
    Running,
    /// A faction won, or the game was stopped without a winner.
    Ended { winner: Option<Group> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceState {
    pub id: InstanceId,
    pub game_master: UserId,
    pub clock: Clock,
    pub status: GameStatus,
    /// Tied lynch slots waiting for the mayor to decide.
    pub undecided_lynches: u32,
    /// Candidates of the last tied lynch vote.
    pub tied_players: Vec<PlayerIdentifier>,
    players: BTreeMap<UserId, Player>,
    locations: BTreeMap<LocationId, Location>,
    /// Designated heir per job.
    successors: BTreeMap<Job, PlayerIdentifier>,
    messages: Vec<ActionMessage>,
    next_location_id: u32,
}

impl InstanceState {
    pub fn new(id: InstanceId, game_master: UserId) -> Self {
        Self {
            id,
            game_master,
            clock: Clock::default(),
            status: GameStatus::Lobby,
            undecided_lynches: 0,
            tied_players: Vec::new(),
            players: BTreeMap::new(),
            locations: BTreeMap::new(),
            successors: BTreeMap::new(),
            messages: Vec::new(),
            next_location_id: 1,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, GameStatus::Running)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.status, GameStatus::Ended { .. })
    }

    /// Identifier the game master acts under when scheduling effects.
    pub const fn game_master_id(&self) -> PlayerIdentifier {
        PlayerIdentifier::new(self.id, self.game_master)
    }

    pub fn game_speed(&self, config: &GameConfig) -> u32 {
        self.clock.game_speed(config.game_speed_interval)
    }

    // ========================================================================
    // Players
    // ========================================================================

    pub fn join(&mut self, user: UserId) -> Result<PlayerIdentifier, StateError> {
        if !matches!(self.status, GameStatus::Lobby) {
            return Err(StateError::GameAlreadyStarted);
        }
        if self.players.contains_key(&user) {
            return Err(StateError::PlayerAlreadyJoined(user));
        }
        let id = PlayerIdentifier::new(self.id, user);
        self.players.insert(user, Player::new(id));
        Ok(id)
    }

    pub fn player(&self, id: PlayerIdentifier) -> Option<&Player> {
        if id.instance != self.id {
            return None;
        }
        self.players.get(&id.user)
    }

    pub fn player_mut(&mut self, id: PlayerIdentifier) -> Option<&mut Player> {
        if id.instance != self.id {
            return None;
        }
        self.players.get_mut(&id.user)
    }

    pub fn require_player(&self, id: PlayerIdentifier) -> Result<&Player, StateError> {
        self.player(id).ok_or(StateError::UnknownPlayer(id))
    }

    pub fn require_player_mut(&mut self, id: PlayerIdentifier) -> Result<&mut Player, StateError> {
        self.player_mut(id).ok_or(StateError::UnknownPlayer(id))
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|player| player.is_alive())
    }

    pub fn player_ids(&self) -> Vec<PlayerIdentifier> {
        self.players.values().map(|player| player.id).collect()
    }

    pub fn alive_ids(&self) -> Vec<PlayerIdentifier> {
        self.alive_players().map(|player| player.id).collect()
    }

    pub fn dead_ids(&self) -> Vec<PlayerIdentifier> {
        self.players
            .values()
            .filter(|player| !player.is_alive())
            .map(|player| player.id)
            .collect()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Alive players flagged to die at the next kill step.
    pub fn marked_ids(&self) -> Vec<PlayerIdentifier> {
        self.alive_players()
            .filter(|player| player.is_marked())
            .map(|player| player.id)
            .collect()
    }

    /// Alive holder of `job`, if any.
    pub fn job_holder(&self, job: Job) -> Option<PlayerIdentifier> {
        self.alive_players()
            .find(|player| player.has_job(job))
            .map(|player| player.id)
    }

    /// Kills a player.
    ///
    /// The deathnote is sealed, successor designations pointing at the victim
    /// are dropped, and every job the victim held passes to its designated
    /// successor (if any) or lapses.
    pub fn kill_player(&mut self, id: PlayerIdentifier) -> Result<(), StateError> {
        let victim = self.require_player_mut(id)?;
        victim.flags.remove(
            PlayerFlags::ALIVE | PlayerFlags::MARKED | PlayerFlags::PROTECTED | PlayerFlags::MUTED,
        );
        victim.deathnote.set_changeable(false);
        let jobs = victim.jobs().to_vec();

        self.successors.retain(|_, successor| *successor != id);

        for job in jobs {
            if let Some(victim) = self.player_mut(id) {
                victim.remove_job(job);
            }
            let Some(heir) = self.successors.remove(&job) else {
                continue;
            };
            let Some(player) = self.player_mut(heir).filter(|player| player.is_alive()) else {
                continue;
            };
            if !player.has_job(job) {
                player.add_job(job)?;
            }
            if job == Job::Mayor {
                self.messages.push(
                    ActionMessage::broadcast(MessageKind::NewMayor)
                        .with_field(heir)
                        .unlocked(),
                );
            }
        }
        Ok(())
    }

    pub fn revive_player(&mut self, id: PlayerIdentifier) -> Result<(), StateError> {
        let player = self.require_player_mut(id)?;
        if player.is_alive() {
            return Err(StateError::PlayerAlreadyAlive(id));
        }
        player.flags.insert(PlayerFlags::ALIVE);
        player.deathnote.set_changeable(true);
        Ok(())
    }

    pub fn set_muted(&mut self, id: PlayerIdentifier, muted: bool) -> Result<(), StateError> {
        let player = self.require_player_mut(id)?;
        player.flags.set(PlayerFlags::MUTED, muted);
        Ok(())
    }

    pub fn clear_protection(&mut self) {
        for player in self.players.values_mut() {
            player.flags.remove(PlayerFlags::PROTECTED);
        }
    }

    // ========================================================================
    // Succession
    // ========================================================================

    pub fn successor(&self, job: Job) -> Option<PlayerIdentifier> {
        self.successors.get(&job).copied()
    }

    pub fn set_successor(&mut self, job: Job, successor: PlayerIdentifier) {
        self.successors.insert(job, successor);
    }

    // ========================================================================
    // Locations
    // ========================================================================

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    pub fn location_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        self.locations.get_mut(&id)
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    fn allocate_location_id(&mut self) -> LocationId {
        let id = LocationId(self.next_location_id);
        self.next_location_id += 1;
        id
    }

    /// Creates a repaired house for `owner` and moves the owner into it.
    pub fn add_house(&mut self, owner: PlayerIdentifier) -> Result<LocationId, StateError> {
        self.require_player(owner)?;
        let id = self.allocate_location_id();
        self.locations.insert(id, Location::house(id, owner));
        let player = self.require_player_mut(owner)?;
        player.house = Some(id);
        player.location = Some(id);
        Ok(id)
    }

    pub fn add_bridge(&mut self, name: impl Into<String>) -> LocationId {
        let id = self.allocate_location_id();
        self.locations.insert(id, Location::bridge(id, name));
        id
    }

    /// Alive players currently at `location`.
    pub fn visitors(&self, location: LocationId) -> Vec<PlayerIdentifier> {
        self.alive_players()
            .filter(|player| player.location == Some(location))
            .map(|player| player.id)
            .collect()
    }

    pub fn move_player(
        &mut self,
        id: PlayerIdentifier,
        location: LocationId,
    ) -> Result<(), StateError> {
        if !self.locations.contains_key(&location) {
            return Err(StateError::UnknownLocation(location));
        }
        self.require_player_mut(id)?.location = Some(location);
        Ok(())
    }

    pub fn send_everyone_home(&mut self) {
        for player in self.players.values_mut() {
            player.location = player.house;
        }
    }

    /// Advances rebuilding of every burned house by one day.
    pub fn rebuild_houses(&mut self) -> Result<(), StateError> {
        for location in self.locations.values_mut() {
            match location.as_house_mut() {
                Some(house) if house.state() == HouseState::Burned => house.build()?,
                _ => {}
            }
        }
        Ok(())
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub fn push_message(&mut self, message: ActionMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ActionMessage] {
        &self.messages
    }

    /// Unlocked messages addressed to `player` or to everyone.
    pub fn messages_for(&self, player: PlayerIdentifier) -> Vec<&ActionMessage> {
        self.messages
            .iter()
            .filter(|message| message.is_visible_to(player))
            .collect()
    }

    pub fn unlock_messages(&mut self) {
        for message in &mut self.messages {
            message.locked = false;
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Starts the game.
    ///
    /// `roles` is the already shuffled role pool, assigned to players in
    /// ascending user order. `minute_of_day` selects the phase the game opens
    /// in; the clock is left one phase earlier so the caller's first phase
    /// advance enters it and runs its side effects.
    pub fn start_game(
        &mut self,
        caller: UserId,
        roles: Vec<MainRole>,
        minute_of_day: u32,
        config: &GameConfig,
    ) -> Result<(), StateError> {
        if caller != self.game_master {
            return Err(StateError::NoPermission);
        }
        let players = self.players.len();
        if players < config.min_players {
            return Err(StateError::NotEnoughPlayers {
                required: config.min_players,
                actual: players,
            });
        }
        if players > config.max_players {
            return Err(StateError::TooManyPlayers {
                max: config.max_players,
                actual: players,
            });
        }
        if !matches!(self.status, GameStatus::Lobby) {
            return Err(StateError::GameAlreadyStarted);
        }
        if roles.len() != players {
            return Err(StateError::NotEnoughRoles {
                roles: roles.len(),
                players,
            });
        }

        for (player, role) in self.players.values_mut().zip(roles) {
            player.assign_main_role(role);
        }
        for id in self.player_ids() {
            self.add_house(id)?;
        }
        for name in &config.bridge_names {
            self.add_bridge(name.clone());
        }

        let opening = DayPhase::from_minute_of_day(minute_of_day, &config.schedule);
        let day = u32::from(opening == DayPhase::Day);
        self.clock = Clock::new(day, opening.previous());
        self.status = GameStatus::Running;
        Ok(())
    }

    /// Ends the game with an optional winning faction.
    pub fn end_game(&mut self, winner: Option<Group>) {
        self.status = GameStatus::Ended { winner };
    }
}
