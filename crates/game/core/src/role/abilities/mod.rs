//! Per-purpose ability behavior.
//!
//! Each purpose validates its own preconditions in a fixed order (the first
//! failing check decides the error), consumes its item and returns the
//! effects to schedule. Information and replenishment live next to the
//! behavior they describe.

mod investigators;
mod jobs;
mod killers;
mod support;

use chrono::{DateTime, Utc};

use crate::action::{Action, ActionArgs, Effect, PlannedAction, PreActionData};
use crate::config::GameConfig;
use crate::role::error::{
    ACTION_DOES_NOT_EXIST, MUST_BE_ALIVE, NO_ACTIONS_LEFT, NOT_A_HOUSE,
};
use crate::role::{ActionError, Item, Job, MainRole, Purpose};
use crate::state::{DayPhase, InstanceState, LocationId, PlayerIdentifier};

/// Mutable view handed to a purpose while it handles one invocation.
pub struct AbilityContext<'a> {
    pub state: &'a mut InstanceState,
    pub config: &'a GameConfig,
    pub actor: PlayerIdentifier,
    pub args: &'a ActionArgs,
    pub now: DateTime<Utc>,
}

impl AbilityContext<'_> {
    fn is_alive(&self) -> bool {
        self.state
            .player(self.actor)
            .is_some_and(|player| player.is_alive())
    }

    fn require_alive(&self) -> Result<(), ActionError> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(ActionError::NotAllowedToPerformAction(MUST_BE_ALIVE))
        }
    }

    fn items(&self, item: Item) -> u32 {
        self.state
            .player(self.actor)
            .map_or(0, |player| player.items.get(item))
    }

    fn require_item(&self, item: Item) -> Result<u32, ActionError> {
        match self.items(item) {
            0 => Err(ActionError::NotAllowedToPerformAction(NO_ACTIONS_LEFT)),
            count => Ok(count),
        }
    }

    fn consume(&mut self, item: Item) {
        if let Some(player) = self.state.player_mut(self.actor) {
            player.items.take(item);
        }
    }

    /// Exact input counts; anything else is rejected with `message`.
    fn require_inputs(
        &self,
        locations: usize,
        players: usize,
        message: &'static str,
    ) -> Result<(), ActionError> {
        if self.args.locations.len() == locations && self.args.players.len() == players {
            Ok(())
        } else {
            Err(ActionError::WrongInput(message))
        }
    }

    fn require_house(&self, location: LocationId) -> Result<(), ActionError> {
        match self.state.location(location) {
            Some(location) if location.is_house() => Ok(()),
            Some(_) => Err(ActionError::WrongInput(NOT_A_HOUSE)),
            None => Err(ActionError::NoSuchLocation(location)),
        }
    }

    fn payload(&self) -> PreActionData {
        PreActionData::new(self.actor, self.args.clone())
    }

    fn queue_now(&self, effect: Effect) -> PlannedAction {
        PlannedAction::queued(self.now, effect, self.payload())
    }

    fn run_now(&self, effect: Effect) -> PlannedAction {
        PlannedAction::immediate(self.now, effect, self.payload())
    }
}

fn require_tag(action: Action, expected: Action) -> Result<(), ActionError> {
    if action == expected {
        Ok(())
    } else {
        Err(ActionError::NoSuchAction(ACTION_DOES_NOT_EXIST))
    }
}

/// Targets a purpose offers for one of its abilities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eligible {
    pub players: Vec<PlayerIdentifier>,
    pub locations: Vec<LocationId>,
}

impl Eligible {
    pub fn players(players: Vec<PlayerIdentifier>) -> Self {
        Self {
            players,
            locations: Vec::new(),
        }
    }

    pub fn locations(locations: Vec<LocationId>) -> Self {
        Self {
            players: Vec::new(),
            locations,
        }
    }
}

/// One currently usable ability with its targets and remaining uses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityInfo {
    pub purpose: Purpose,
    pub action: Action,
    pub eligible: Eligible,
    pub remaining: u32,
}

/// Read-only view used to compute ability information.
pub(crate) struct InfoContext<'a> {
    pub state: &'a InstanceState,
    pub actor: PlayerIdentifier,
}

impl InfoContext<'_> {
    fn items(&self, item: Item) -> u32 {
        self.state
            .player(self.actor)
            .map_or(0, |player| player.items.get(item))
    }

    fn phase_is(&self, phase: DayPhase) -> bool {
        self.state.clock.phase == phase
    }

    /// Houses of alive players matching `filter`, then every bridge.
    fn houses_and_bridges(&self, filter: impl Fn(&crate::state::Player) -> bool) -> Vec<LocationId> {
        let mut locations: Vec<LocationId> = self
            .state
            .alive_players()
            .filter(|player| filter(player))
            .filter_map(|player| player.house)
            .collect();
        locations.extend(
            self.state
                .locations()
                .filter(|location| location.is_bridge())
                .map(|location| location.id),
        );
        locations
    }
}

pub(crate) fn perform(
    purpose: Purpose,
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    match purpose {
        Purpose::Main(MainRole::Archer) => killers::archer(ctx, action),
        Purpose::Main(MainRole::Poisoner) => killers::poisoner(ctx, action),
        Purpose::Main(MainRole::Arsonist) => killers::arsonist(ctx, action),
        Purpose::Main(MainRole::Clairvoyant) => investigators::clairvoyant(ctx, action),
        Purpose::Main(MainRole::PrivateInvestigator) => {
            investigators::private_investigator(ctx, action)
        }
        Purpose::Main(MainRole::GuardianAngel) => support::guardian_angel(ctx, action),
        Purpose::Main(MainRole::Healer) => support::healer(ctx, action),
        Purpose::Main(MainRole::Medium) => support::medium(ctx, action),
        Purpose::Main(MainRole::Graverobber) => support::graverobber(ctx, action),
        Purpose::Job(Job::AlphaWolf) => jobs::alpha_wolf(ctx, action),
        Purpose::Job(Job::Mayor) => jobs::mayor(ctx, action),
        Purpose::Job(Job::Blacksmith) => jobs::blacksmith(ctx, action),
        _ => Err(ActionError::NoSuchAction(ACTION_DOES_NOT_EXIST)),
    }
}

pub(crate) fn information(purpose: Purpose, ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    match purpose {
        Purpose::Main(MainRole::Archer) => killers::archer_information(ctx),
        Purpose::Main(MainRole::Poisoner) => killers::poisoner_information(ctx),
        Purpose::Main(MainRole::Arsonist) => killers::arsonist_information(ctx),
        Purpose::Main(MainRole::Clairvoyant) => investigators::clairvoyant_information(ctx),
        Purpose::Main(MainRole::PrivateInvestigator) => {
            investigators::private_investigator_information(ctx)
        }
        Purpose::Main(MainRole::GuardianAngel) => support::guardian_angel_information(ctx),
        Purpose::Main(MainRole::Healer) => support::healer_information(ctx),
        Purpose::Main(MainRole::Medium) => support::medium_information(ctx),
        Purpose::Main(MainRole::Graverobber) => support::graverobber_information(ctx),
        Purpose::Job(Job::AlphaWolf) => jobs::alpha_wolf_information(ctx),
        Purpose::Job(Job::Mayor) => jobs::mayor_information(ctx),
        Purpose::Job(Job::Blacksmith) => jobs::blacksmith_information(ctx),
        _ => Vec::new(),
    }
}

/// Refills the consumable items a purpose grants for the coming night.
pub(crate) fn replenish(
    purpose: Purpose,
    state: &mut InstanceState,
    player: PlayerIdentifier,
    config: &GameConfig,
) {
    let day = state.clock.day;
    let game_speed = state.game_speed(config);
    let player_count = state.player_count();
    let Some(player) = state.player_mut(player) else {
        return;
    };

    match purpose {
        Purpose::Main(MainRole::Archer) => {
            player.items.clear(Item::Arrow);
            if day > 0 && day % GameConfig::ARCHER_ARROW_DAY_INTERVAL == 0 {
                player.items.add(Item::Arrow, 1);
            }
        }
        Purpose::Main(MainRole::Clairvoyant) => player.items.set(Item::Seen, 1),
        Purpose::Main(MainRole::GuardianAngel) => player.items.set(Item::Guard, 1),
        Purpose::Main(MainRole::PrivateInvestigator) => {
            let investigations = (player_count / GameConfig::PLAYERS_PER_INVESTIGATION).max(1);
            player
                .items
                .set(Item::Investigation, u32::try_from(investigations).unwrap_or(u32::MAX));
        }
        Purpose::Job(Job::AlphaWolf) => player.items.top_up(Item::Kill, game_speed + 1),
        _ => {}
    }
}
