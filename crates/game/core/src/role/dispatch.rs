//! Entry points routing ability use to the purpose that grants it.

use chrono::{DateTime, Utc};

use super::abilities::{self, AbilityContext, AbilityInfo, InfoContext};
use super::error::NOT_GRANTED;
use super::{ActionError, Purpose};
use crate::action::{Action, ActionArgs, PlannedAction};
use crate::config::GameConfig;
use crate::state::{InstanceState, PlayerIdentifier};

/// Validates and plans one ability invocation.
///
/// The first purpose of the actor (main role, double roles, jobs) that grants
/// `action` handles it. Items are consumed on success; the returned plans
/// still have to be stored or executed by the caller.
pub fn perform_action(
    state: &mut InstanceState,
    config: &GameConfig,
    actor: PlayerIdentifier,
    action: Action,
    args: &ActionArgs,
    now: DateTime<Utc>,
) -> Result<Vec<PlannedAction>, ActionError> {
    if !state.is_running() {
        return Err(ActionError::GameNotRunning);
    }
    let player = state
        .player(actor)
        .ok_or(ActionError::NoSuchPlayer(actor))?;
    let purpose = player
        .purposes()
        .find(|purpose| purpose.grants(action))
        .ok_or(ActionError::NoPermission(NOT_GRANTED))?;

    if let Some(missing) = args.players.iter().find(|id| state.player(**id).is_none()) {
        return Err(ActionError::NoSuchPlayer(*missing));
    }
    if let Some(missing) = args.locations.iter().find(|id| state.location(**id).is_none()) {
        return Err(ActionError::NoSuchLocation(*missing));
    }

    let mut ctx = AbilityContext {
        state,
        config,
        actor,
        args,
        now,
    };
    abilities::perform(purpose, &mut ctx, action)
}

/// Abilities the player can use right now. Dead or unknown players get none.
pub fn information(state: &InstanceState, actor: PlayerIdentifier) -> Vec<AbilityInfo> {
    let Some(player) = state.player(actor).filter(|player| player.is_alive()) else {
        return Vec::new();
    };
    let ctx = InfoContext { state, actor };
    player
        .purposes()
        .flat_map(|purpose| abilities::information(purpose, &ctx))
        .collect()
}

/// Refills the items of every alive player's purposes.
pub fn replenish_all(state: &mut InstanceState, config: &GameConfig) {
    let holders: Vec<(PlayerIdentifier, Vec<Purpose>)> = state
        .alive_players()
        .map(|player| (player.id, player.purposes().collect()))
        .collect();
    for (player, purposes) in holders {
        for purpose in purposes {
            abilities::replenish(purpose, state, player, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Effect, Timing};
    use crate::role::error::{
        MUST_BE_ALIVE, NO_ACTIONS_LEFT, NO_UNDECIDED_LYNCHES, SUCCESSOR_ALREADY_CHOSEN,
        TARGET_STILL_ALIVE,
    };
    use crate::role::{Item, Job, MainRole};
    use crate::state::tests::{create_test_instance, pid};
    use crate::state::{DayPhase, LocationId};

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    fn perform(
        state: &mut InstanceState,
        actor: PlayerIdentifier,
        action: Action,
        args: ActionArgs,
    ) -> Result<Vec<PlannedAction>, ActionError> {
        perform_action(state, &GameConfig::new(), actor, action, &args, now())
    }

    fn house_of(state: &InstanceState, user: u32) -> LocationId {
        state.player(pid(user)).unwrap().house.unwrap()
    }

    #[test]
    fn actions_without_a_granting_purpose_are_rejected() {
        let mut state = create_test_instance(&[MainRole::Townsperson, MainRole::Healer]);
        let error = perform(&mut state, pid(1), Action::Heal, ActionArgs::players([pid(2)]))
            .unwrap_err();
        assert_eq!(error, ActionError::NoPermission(NOT_GRANTED));
    }

    #[test]
    fn unknown_targets_are_rejected_before_the_purpose_runs() {
        let mut state = create_test_instance(&[MainRole::Healer, MainRole::Archer]);
        let error = perform(&mut state, pid(1), Action::Heal, ActionArgs::players([pid(9)]))
            .unwrap_err();
        assert_eq!(error, ActionError::NoSuchPlayer(pid(9)));
        assert_eq!(state.player(pid(1)).unwrap().items.get(Item::Medkit), 1);
    }

    #[test]
    fn dead_actors_cannot_heal() {
        let mut state = create_test_instance(&[MainRole::Healer, MainRole::Archer]);
        state.kill_player(pid(1)).unwrap();
        let error = perform(&mut state, pid(1), Action::Heal, ActionArgs::players([pid(2)]))
            .unwrap_err();
        assert_eq!(error, ActionError::NotAllowedToPerformAction(MUST_BE_ALIVE));
    }

    #[test]
    fn alpha_wolf_kill_is_limited_by_kill_count() {
        let mut state = create_test_instance(&[
            MainRole::Werewolf,
            MainRole::Healer,
            MainRole::Townsperson,
        ]);
        state.require_player_mut(pid(1)).unwrap().add_job(Job::AlphaWolf).unwrap();
        assert_eq!(state.player(pid(1)).unwrap().items.get(Item::Kill), 1);
        let target = house_of(&state, 2);

        let plans = perform(
            &mut state,
            pid(1),
            Action::AlphaWolfKill,
            ActionArgs::locations([target]),
        )
        .unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(
            plans[0].effect,
            Effect::Composite(vec![Effect::MoveToLocation, Effect::KillPlayers])
        );
        assert_eq!(plans[1].effect, Effect::MoveToLocation);
        assert_eq!(plans[1].payload.args.locations, vec![house_of(&state, 1)]);
        assert!(plans[1].time > plans[0].time);
        assert_eq!(state.player(pid(1)).unwrap().items.get(Item::Kill), 0);

        let error = perform(
            &mut state,
            pid(1),
            Action::AlphaWolfKill,
            ActionArgs::locations([target]),
        )
        .unwrap_err();
        assert_eq!(error, ActionError::NotAllowedToPerformAction(NO_ACTIONS_LEFT));
    }

    #[test]
    fn archers_start_without_arrows() {
        let mut state = create_test_instance(&[MainRole::Archer, MainRole::Healer]);
        let error = perform(&mut state, pid(1), Action::Shoot, ActionArgs::players([pid(2)]))
            .unwrap_err();
        assert_eq!(error, ActionError::NotAllowedToPerformAction(NO_ACTIONS_LEFT));
    }

    #[test]
    fn graverobber_needs_a_dead_target() {
        let mut state = create_test_instance(&[MainRole::Graverobber, MainRole::Medium]);
        let error = perform(&mut state, pid(1), Action::RobGrave, ActionArgs::players([pid(2)]))
            .unwrap_err();
        assert_eq!(error, ActionError::NotAllowedToPerformAction(TARGET_STILL_ALIVE));

        state.kill_player(pid(2)).unwrap();
        let plans = perform(&mut state, pid(1), Action::RobGrave, ActionArgs::players([pid(2)]))
            .unwrap();
        assert_eq!(plans[0].timing, Timing::Immediate);
        assert_eq!(plans[0].effect, Effect::ChangeRole);
    }

    #[test]
    fn poison_is_delayed() {
        let mut state = create_test_instance(&[MainRole::Poisoner, MainRole::Healer]);
        let target = house_of(&state, 2);
        let plans = perform(&mut state, pid(1), Action::Poison, ActionArgs::locations([target]))
            .unwrap();
        let delay = plans[0].time - now();
        assert_eq!(delay.num_minutes(), GameConfig::DEFAULT_POISON_DELAY_MINUTES);
    }

    #[test]
    fn mayor_decides_only_among_tied_players() {
        let mut state = create_test_instance(&[
            MainRole::Townsperson,
            MainRole::Werewolf,
            MainRole::Healer,
        ]);
        state.require_player_mut(pid(1)).unwrap().add_job(Job::Mayor).unwrap();

        let error =
            perform(&mut state, pid(1), Action::MayorDecide, ActionArgs::players([pid(2)]))
                .unwrap_err();
        assert_eq!(error, ActionError::NotAllowedToPerformAction(NO_UNDECIDED_LYNCHES));

        state.undecided_lynches = 1;
        state.tied_players = vec![pid(2), pid(3)];
        assert!(matches!(
            perform(&mut state, pid(1), Action::MayorDecide, ActionArgs::players([pid(1)])),
            Err(ActionError::WrongInput(_))
        ));
        let plans =
            perform(&mut state, pid(1), Action::MayorDecide, ActionArgs::players([pid(2)]))
                .unwrap();
        assert_eq!(plans[0].timing, Timing::Immediate);
    }

    #[test]
    fn successors_are_chosen_once() {
        let mut state = create_test_instance(&[MainRole::Townsperson, MainRole::Healer]);
        state.require_player_mut(pid(1)).unwrap().add_job(Job::Mayor).unwrap();

        let plans =
            perform(&mut state, pid(1), Action::SuccessorMayor, ActionArgs::players([pid(2)]))
                .unwrap();
        assert!(plans.is_empty());
        assert_eq!(state.successor(Job::Mayor), Some(pid(2)));

        let error =
            perform(&mut state, pid(1), Action::SuccessorMayor, ActionArgs::players([pid(2)]))
                .unwrap_err();
        assert_eq!(error, ActionError::NotAllowedToPerformAction(SUCCESSOR_ALREADY_CHOSEN));
    }

    #[test]
    fn information_follows_phase_and_liveness() {
        let mut state = create_test_instance(&[MainRole::Healer, MainRole::GuardianAngel]);

        state.require_player_mut(pid(1)).unwrap().flags.insert(crate::state::PlayerFlags::MARKED);
        let healer = information(&state, pid(1));
        assert_eq!(healer.len(), 1);
        assert_eq!(healer[0].eligible.players, vec![pid(1)]);

        assert!(information(&state, pid(2)).is_empty());
        replenish_all(&mut state, &GameConfig::new());
        state.clock.phase = DayPhase::Evening;
        assert_eq!(information(&state, pid(2))[0].action, Action::Protect);

        state.kill_player(pid(2)).unwrap();
        assert!(information(&state, pid(2)).is_empty());
    }

    #[test]
    fn replenish_tops_up_alpha_wolf_kills() {
        let mut state = create_test_instance(&[MainRole::Werewolf, MainRole::Healer]);
        state.require_player_mut(pid(1)).unwrap().add_job(Job::AlphaWolf).unwrap();
        state.require_player_mut(pid(1)).unwrap().items.set(Item::Kill, 0);
        state.clock.day = 5;

        replenish_all(&mut state, &GameConfig::new());
        assert_eq!(state.player(pid(1)).unwrap().items.get(Item::Kill), 2);
    }
}
