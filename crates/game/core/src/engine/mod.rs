//! Effect execution pipeline.
//!
//! The [`RulesEngine`] is the only path through which queued and immediate
//! actions mutate an [`InstanceState`]. Every effect runs through the
//! transition phases and failures carry the record id, the effect name and
//! the pipeline phase that rejected it.

mod errors;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use chrono::{DateTime, Utc};

use crate::action::{ActionRecord, Effect, EffectContext, PreActionData};
use crate::error::ErrorContext;
use crate::state::{ActionId, InstanceState};

pub struct RulesEngine<'a> {
    state: &'a mut InstanceState,
}

impl<'a> RulesEngine<'a> {
    pub fn new(state: &'a mut InstanceState) -> Self {
        Self { state }
    }

    /// Executes a stored record with its own payload, time and id.
    pub fn execute_record(&mut self, record: &ActionRecord) -> Result<(), ExecuteError> {
        self.execute(&record.effect, &record.payload, record.time, Some(record.id))
    }

    /// Executes an effect against the instance.
    ///
    /// The state is left as the failing transition left it; callers that need
    /// all-or-nothing semantics execute against a copy.
    pub fn execute(
        &mut self,
        effect: &Effect,
        payload: &PreActionData,
        time: DateTime<Utc>,
        action_id: Option<ActionId>,
    ) -> Result<(), ExecuteError> {
        let ctx = EffectContext::new(payload, time, action_id);
        transition::execute_effect(effect, self.state, &ctx).map_err(|(effect, source)| {
            ExecuteError {
                effect,
                action_id,
                source,
                context: ErrorContext::new().with_actor(payload.actor),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionArgs, EffectError, KillCause};
    use crate::location::HouseState;
    use crate::role::{Job, MainRole};
    use crate::state::tests::{create_test_instance, pid};
    use crate::state::{MessageKind, PlayerFlags, PlayerIdentifier};

    fn run(
        state: &mut InstanceState,
        effect: Effect,
        actor: PlayerIdentifier,
        args: ActionArgs,
    ) -> Result<(), ExecuteError> {
        let payload = PreActionData::new(actor, args);
        RulesEngine::new(state).execute(&effect, &payload, DateTime::<Utc>::UNIX_EPOCH, None)
    }

    fn house_of(state: &InstanceState, user: u32) -> crate::state::LocationId {
        state.player(pid(user)).unwrap().house.unwrap()
    }

    #[test]
    fn alpha_wolf_kill_marks_visitors_but_spares_wolves() {
        let mut state = create_test_instance(&[
            MainRole::Werewolf,
            MainRole::Werewolf,
            MainRole::Healer,
            MainRole::Archer,
        ]);
        state.require_player_mut(pid(1)).unwrap().add_job(Job::AlphaWolf).unwrap();
        let target = house_of(&state, 3);
        state.move_player(pid(2), target).unwrap();
        state.move_player(pid(4), target).unwrap();

        run(&mut state, Effect::KillPlayers, pid(1), ActionArgs::locations([target])).unwrap();

        assert!(!state.player(pid(2)).unwrap().is_marked());
        assert!(state.player(pid(3)).unwrap().is_marked());
        assert!(state.player(pid(4)).unwrap().is_marked());
    }

    #[test]
    fn protected_players_are_not_marked() {
        let mut state = create_test_instance(&[MainRole::Archer, MainRole::Healer]);
        run(&mut state, Effect::ProtectPlayers, pid(2), ActionArgs::players([pid(2)])).unwrap();
        run(&mut state, Effect::KillPlayers, pid(1), ActionArgs::players([pid(2)])).unwrap();
        assert!(!state.player(pid(2)).unwrap().is_marked());
    }

    #[test]
    fn heal_then_kill_marked_spares_the_patient() {
        let mut state =
            create_test_instance(&[MainRole::Archer, MainRole::Healer, MainRole::Townsperson]);
        run(&mut state, Effect::KillPlayers, pid(1), ActionArgs::players([pid(2), pid(3)]))
            .unwrap();
        run(&mut state, Effect::HealPlayer, pid(2), ActionArgs::players([pid(3)])).unwrap();

        let marked = state.marked_ids();
        assert_eq!(marked, vec![pid(2)]);
        let game_master = state.game_master_id();
        run(
            &mut state,
            Effect::KillMarkedPlayers(KillCause::Night),
            game_master,
            ActionArgs::players(marked),
        )
        .unwrap();

        assert!(!state.player(pid(2)).unwrap().is_alive());
        assert!(state.player(pid(3)).unwrap().is_alive());
        let broadcast = state.messages().last().unwrap();
        assert_eq!(broadcast.kind, MessageKind::NightKillBroadcast);
        assert!(broadcast.locked);
    }

    #[test]
    fn change_role_copies_the_donor_role() {
        let mut state = create_test_instance(&[MainRole::Graverobber, MainRole::Medium]);
        state.kill_player(pid(2)).unwrap();

        run(&mut state, Effect::ChangeRole, pid(1), ActionArgs::players([pid(2)])).unwrap();

        let robber = state.player(pid(1)).unwrap();
        assert_eq!(robber.main_role, Some(MainRole::Medium));
        assert!(state.messages_for(pid(1)).iter().any(|m| m.kind == MessageKind::ChangedRole));
    }

    #[test]
    fn composite_children_share_the_parent_payload() {
        let mut state = create_test_instance(&[MainRole::Werewolf, MainRole::Healer]);
        state.require_player_mut(pid(1)).unwrap().add_job(Job::AlphaWolf).unwrap();
        let target = house_of(&state, 2);

        run(
            &mut state,
            Effect::Composite(vec![Effect::MoveToLocation, Effect::KillPlayers]),
            pid(1),
            ActionArgs::locations([target]),
        )
        .unwrap();

        assert_eq!(state.player(pid(1)).unwrap().location, Some(target));
        assert!(state.player(pid(2)).unwrap().is_marked());
    }

    #[test]
    fn burning_marks_everyone_inside() {
        let mut state = create_test_instance(&[MainRole::Arsonist, MainRole::Healer]);
        let target = house_of(&state, 2);
        run(&mut state, Effect::SoakHouse, pid(1), ActionArgs::locations([target])).unwrap();
        run(&mut state, Effect::BurnHouse, pid(1), ActionArgs::new()).unwrap();

        let house = state.location(target).unwrap().as_house().unwrap();
        assert_eq!(house.state(), HouseState::Burned);
        assert!(state.player(pid(2)).unwrap().flags.contains(PlayerFlags::MARKED));
    }

    #[test]
    fn failures_report_effect_and_phase() {
        let mut state = create_test_instance(&[MainRole::Healer, MainRole::Archer]);
        let error =
            run(&mut state, Effect::HealPlayer, pid(1), ActionArgs::new()).unwrap_err();

        assert_eq!(error.effect, "heal_player");
        assert_eq!(error.phase(), TransitionPhase::PreValidate);
        assert_eq!(error.effect_error(), &EffectError::MissingTarget);
    }

    #[test]
    fn reviving_an_alive_player_fails_in_apply() {
        let mut state = create_test_instance(&[MainRole::Medium, MainRole::Archer]);
        let error =
            run(&mut state, Effect::RevivePlayers, pid(1), ActionArgs::players([pid(2)]))
                .unwrap_err();
        assert_eq!(error.phase(), TransitionPhase::Apply);
    }
}
