use chrono::Duration;

use super::{AbilityContext, AbilityInfo, Eligible, InfoContext, require_tag};
use crate::action::{Action, ActionArgs, Effect, PlannedAction, PreActionData};
use crate::location::{HouseMethod, HouseState};
use crate::role::error::{
    ACTION_DOES_NOT_EXIST, NO_UNDECIDED_LYNCHES, SELECT_ONE_LOCATION, SUCCESSOR_ALREADY_CHOSEN,
    WRONG_AMOUNT_OF_INPUTS, WRONG_INPUT,
};
use crate::role::{ActionError, Item, Job, Purpose};
use crate::state::DayPhase;

/// Records the heir of `job`; only one choice is allowed per holder.
fn choose_successor(
    ctx: &mut AbilityContext<'_>,
    job: Job,
) -> Result<Vec<PlannedAction>, ActionError> {
    if ctx.state.successor(job).is_some() {
        return Err(ActionError::NotAllowedToPerformAction(
            SUCCESSOR_ALREADY_CHOSEN,
        ));
    }
    if ctx.args.players.len() != 1 {
        return Err(ActionError::NoPermission(WRONG_INPUT));
    }

    ctx.state.set_successor(job, ctx.args.players[0]);
    Ok(Vec::new())
}

// ============================================================================
// Alpha wolf
// ============================================================================

/// Plans the pack's night: one visit per chosen location, staggered so each
/// kill resolves in order, then a walk back home.
pub(super) fn alpha_wolf(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    match action {
        Action::AlphaWolfKill => {
            let kills = ctx.require_item(Item::Kill)?;
            let args = ctx.args;
            let targets = &args.locations;
            if !ctx.args.players.is_empty()
                || targets.is_empty()
                || targets.len() > kills as usize
            {
                return Err(ActionError::NotAllowedToPerformAction(
                    WRONG_AMOUNT_OF_INPUTS,
                ));
            }

            let stagger = Duration::minutes(ctx.config.alpha_wolf_kill_stagger_minutes);
            let mut time = ctx.now;
            let mut plans = Vec::with_capacity(targets.len() + 1);
            for location in targets {
                let payload = PreActionData::new(ctx.actor, ActionArgs::locations([*location]));
                plans.push(PlannedAction::queued(
                    time,
                    Effect::Composite(vec![Effect::MoveToLocation, Effect::KillPlayers]),
                    payload,
                ));
                time += stagger;
            }

            let home = ctx.state.player(ctx.actor).and_then(|player| player.house);
            if let Some(home) = home {
                let payload = PreActionData::new(ctx.actor, ActionArgs::locations([home]));
                plans.push(PlannedAction::queued(time, Effect::MoveToLocation, payload));
            }

            ctx.consume(Item::Kill);
            Ok(plans)
        }
        Action::SuccessorAlphaWolf => choose_successor(ctx, Job::AlphaWolf),
        _ => Err(ActionError::NoSuchAction(ACTION_DOES_NOT_EXIST)),
    }
}

pub(super) fn alpha_wolf_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let purpose = Purpose::Job(Job::AlphaWolf);
    let mut info = Vec::new();

    let kills = ctx.items(Item::Kill);
    if kills > 0 && ctx.phase_is(DayPhase::Evening) {
        info.push(AbilityInfo {
            purpose,
            action: Action::AlphaWolfKill,
            eligible: Eligible::locations(ctx.houses_and_bridges(|player| !player.is_werewolf())),
            remaining: kills,
        });
    }

    if ctx.state.successor(Job::AlphaWolf).is_none() {
        let wolves = ctx
            .state
            .alive_players()
            .filter(|player| player.is_werewolf() && player.id != ctx.actor)
            .map(|player| player.id)
            .collect();
        info.push(AbilityInfo {
            purpose,
            action: Action::SuccessorAlphaWolf,
            eligible: Eligible::players(wolves),
            remaining: 1,
        });
    }
    info
}

// ============================================================================
// Mayor
// ============================================================================

/// Breaks a tied lynch vote by picking among the tied candidates.
pub(super) fn mayor(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    match action {
        Action::MayorDecide => {
            let undecided = ctx.state.undecided_lynches;
            if undecided == 0 {
                return Err(ActionError::NotAllowedToPerformAction(NO_UNDECIDED_LYNCHES));
            }
            let chosen = &ctx.args.players;
            let valid = !chosen.is_empty()
                && chosen.len() <= undecided as usize
                && chosen
                    .iter()
                    .all(|player| ctx.state.tied_players.contains(player));
            if !valid {
                return Err(ActionError::WrongInput(WRONG_INPUT));
            }
            Ok(vec![ctx.run_now(Effect::MayorDecide)])
        }
        Action::SuccessorMayor => choose_successor(ctx, Job::Mayor),
        _ => Err(ActionError::NoSuchAction(ACTION_DOES_NOT_EXIST)),
    }
}

pub(super) fn mayor_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let purpose = Purpose::Job(Job::Mayor);
    let mut info = Vec::new();

    if ctx.state.successor(Job::Mayor).is_none() {
        let candidates = ctx
            .state
            .alive_players()
            .filter(|player| player.id != ctx.actor)
            .map(|player| player.id)
            .collect();
        info.push(AbilityInfo {
            purpose,
            action: Action::SuccessorMayor,
            eligible: Eligible::players(candidates),
            remaining: 1,
        });
    }

    let undecided = ctx.state.undecided_lynches;
    if undecided > 0 && ctx.phase_is(DayPhase::Execution) {
        info.push(AbilityInfo {
            purpose,
            action: Action::MayorDecide,
            eligible: Eligible::players(ctx.state.tied_players.clone()),
            remaining: undecided,
        });
    }
    info
}

// ============================================================================
// Blacksmith
// ============================================================================

pub(super) fn blacksmith(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    require_tag(action, Action::Clean)?;
    ctx.require_inputs(1, 0, SELECT_ONE_LOCATION)?;
    ctx.require_house(ctx.args.locations[0])?;

    Ok(vec![ctx.queue_now(Effect::CleanHouse)])
}

pub(super) fn blacksmith_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let damaged: Vec<_> = ctx
        .state
        .locations()
        .filter(|location| {
            location.as_house().is_some_and(|house| {
                house.state() != HouseState::Repaired && house.can(HouseMethod::Repair)
            })
        })
        .map(|location| location.id)
        .collect();
    if damaged.is_empty() {
        return Vec::new();
    }
    vec![AbilityInfo {
        purpose: Purpose::Job(Job::Blacksmith),
        action: Action::Clean,
        eligible: Eligible::locations(damaged),
        remaining: 1,
    }]
}
