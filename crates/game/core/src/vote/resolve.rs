//! Turns a tally into game consequences.

use chrono::{DateTime, Utc};

use super::{Tally, VoteError, VoteType};
use crate::action::{ActionArgs, Effect, PlannedAction, PreActionData};
use crate::config::GameConfig;
use crate::role::Job;
use crate::state::{InstanceState, PlayerIdentifier};

/// Lynch picks, with the slots the mayor still has to decide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LynchOutcome {
    pub picked: Vec<PlayerIdentifier>,
    pub tied: Vec<PlayerIdentifier>,
    pub undecided: u32,
}

impl LynchOutcome {
    /// Takes the top `slots` targets. When the first target left out has as
    /// many votes as the last one taken, every target with that count is tied
    /// and the slots they held stay undecided.
    pub fn from_tally(tally: &Tally, slots: usize) -> Self {
        let entries = tally.entries();
        if slots == 0 || entries.is_empty() {
            return Self::default();
        }
        let taken = slots.min(entries.len());
        let mut picked: Vec<_> = entries[..taken].iter().map(|(player, _)| *player).collect();

        let last_count = entries[taken - 1].1;
        let tie = entries
            .get(taken)
            .is_some_and(|(_, count)| *count == last_count);
        if !tie {
            return Self {
                picked,
                ..Self::default()
            };
        }

        let tied: Vec<_> = entries
            .iter()
            .filter(|(_, count)| *count == last_count)
            .map(|(player, _)| *player)
            .collect();
        let before = picked.len();
        picked.retain(|player| !tied.contains(player));
        let undecided = u32::try_from(before - picked.len()).unwrap_or(u32::MAX);
        Self {
            picked,
            tied,
            undecided,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaWolfOutcome {
    NoVotes,
    /// Another wolf received votes too; the pack has to vote again.
    Reelection,
    Elected(PlayerIdentifier),
}

impl AlphaWolfOutcome {
    pub fn from_tally(tally: &Tally) -> Self {
        match tally.entries() {
            [] => AlphaWolfOutcome::NoVotes,
            [_, (_, runner_up), ..] if *runner_up > 0 => AlphaWolfOutcome::Reelection,
            [(winner, _), ..] => AlphaWolfOutcome::Elected(*winner),
        }
    }
}

/// Consequences of an ended vote.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteResolution {
    /// Effects to store in the action queue.
    pub plans: Vec<PlannedAction>,
    /// A new vote of the same type has to be started.
    pub reelection: bool,
}

/// Applies the tally of an ended vote to the instance.
///
/// Lynch picks are marked by the game master and ties are handed to the
/// mayor, a mayor vote schedules the new mayor, and a unanimous alpha wolf
/// vote hands out the job right away.
pub fn resolve(
    vote_type: VoteType,
    tally: &Tally,
    state: &mut InstanceState,
    config: &GameConfig,
    now: DateTime<Utc>,
) -> Result<VoteResolution, VoteError> {
    let game_master = state.game_master_id();
    let mut resolution = VoteResolution::default();

    match vote_type {
        VoteType::Lynch => {
            let slots = (state.game_speed(config) + config.lynch_base_count) as usize;
            let outcome = LynchOutcome::from_tally(tally, slots);
            if !outcome.tied.is_empty() {
                state.tied_players = outcome.tied;
                state.undecided_lynches = outcome.undecided;
            }
            if !outcome.picked.is_empty() {
                resolution.plans.push(PlannedAction::queued(
                    now,
                    Effect::KillPlayers,
                    PreActionData::new(game_master, ActionArgs::players(outcome.picked)),
                ));
            }
        }
        VoteType::Mayor => {
            if let Some((mayor, _)) = tally.entries().first() {
                resolution.plans.push(PlannedAction::queued(
                    now,
                    Effect::NewMayor,
                    PreActionData::new(game_master, ActionArgs::players([*mayor])),
                ));
            }
        }
        VoteType::AlphaWolf => match AlphaWolfOutcome::from_tally(tally) {
            AlphaWolfOutcome::Reelection => resolution.reelection = true,
            AlphaWolfOutcome::Elected(winner) => {
                let player = state.require_player_mut(winner)?;
                if !player.has_job(Job::AlphaWolf) {
                    player.add_job(Job::AlphaWolf)?;
                }
            }
            AlphaWolfOutcome::NoVotes => {}
        },
        VoteType::Misc => {}
    }
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::{Item, MainRole};
    use crate::state::tests::{create_test_instance, pid};
    use crate::vote::Ballot;

    fn tally(ballots: &[(u32, u32)]) -> Tally {
        let ballots: Vec<_> = ballots
            .iter()
            .map(|(voter, target)| Ballot::new(pid(*voter), pid(*target)))
            .collect();
        Tally::from_ballots(&ballots)
    }

    #[test]
    fn clear_lynch_winner_is_picked() {
        let outcome = LynchOutcome::from_tally(&tally(&[(1, 3), (2, 3), (3, 1)]), 1);
        assert_eq!(outcome.picked, vec![pid(3)]);
        assert!(outcome.tied.is_empty());
        assert_eq!(outcome.undecided, 0);
    }

    #[test]
    fn tied_lynch_leaves_slots_undecided() {
        let outcome = LynchOutcome::from_tally(&tally(&[(1, 3), (2, 2), (3, 1), (4, 1)]), 2);
        // 1 has two votes; 2 and 3 tie for the second slot.
        assert_eq!(outcome.picked, vec![pid(1)]);
        assert_eq!(outcome.tied, vec![pid(2), pid(3)]);
        assert_eq!(outcome.undecided, 1);
    }

    #[test]
    fn alpha_wolf_reelection_when_split() {
        assert_eq!(
            AlphaWolfOutcome::from_tally(&tally(&[(1, 2), (2, 1)])),
            AlphaWolfOutcome::Reelection
        );
        assert_eq!(
            AlphaWolfOutcome::from_tally(&tally(&[(1, 2), (2, 2)])),
            AlphaWolfOutcome::Elected(pid(2))
        );
        assert_eq!(AlphaWolfOutcome::from_tally(&Tally::default()), AlphaWolfOutcome::NoVotes);
    }

    #[test]
    fn elected_alpha_wolf_receives_job_and_kill() {
        let mut state = create_test_instance(&[MainRole::Werewolf, MainRole::Werewolf]);
        let resolution = resolve(
            VoteType::AlphaWolf,
            &tally(&[(1, 2), (2, 2)]),
            &mut state,
            &GameConfig::new(),
            DateTime::<Utc>::UNIX_EPOCH,
        )
        .unwrap();

        assert!(!resolution.reelection);
        let wolf = state.player(pid(2)).unwrap();
        assert!(wolf.has_job(Job::AlphaWolf));
        assert_eq!(wolf.items.get(Item::Kill), 1);
    }

    #[test]
    fn tied_lynch_updates_instance() {
        let mut state = create_test_instance(&[
            MainRole::Werewolf,
            MainRole::Healer,
            MainRole::Townsperson,
        ]);
        let resolution = resolve(
            VoteType::Lynch,
            &tally(&[(1, 2), (2, 3)]),
            &mut state,
            &GameConfig::new(),
            DateTime::<Utc>::UNIX_EPOCH,
        )
        .unwrap();

        assert!(resolution.plans.is_empty());
        assert_eq!(state.undecided_lynches, 1);
        assert_eq!(state.tied_players, vec![pid(2), pid(3)]);
    }

    #[test]
    fn mayor_vote_schedules_new_mayor() {
        let mut state = create_test_instance(&[MainRole::Werewolf, MainRole::Healer]);
        let resolution = resolve(
            VoteType::Mayor,
            &tally(&[(1, 2), (2, 2)]),
            &mut state,
            &GameConfig::new(),
            DateTime::<Utc>::UNIX_EPOCH,
        )
        .unwrap();

        let plan = &resolution.plans[0];
        assert_eq!(plan.effect, Effect::NewMayor);
        assert_eq!(plan.payload.args.players, vec![pid(2)]);
        assert_eq!(plan.payload.actor, state.game_master_id());
    }
}
