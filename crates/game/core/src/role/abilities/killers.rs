use chrono::Duration;

use super::{AbilityContext, AbilityInfo, Eligible, InfoContext, require_tag};
use crate::action::{Action, Effect, PlannedAction};
use crate::location::HouseState;
use crate::role::error::{
    ACTION_DOES_NOT_EXIST, SELECT_ONE_LOCATION, SELECT_ONE_PLAYER, WRONG_AMOUNT_OF_INPUTS,
};
use crate::role::{ActionError, Item, MainRole, Purpose};
use crate::state::DayPhase;

pub(super) fn archer(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_item(Item::Arrow)?;
    ctx.require_alive()?;
    require_tag(action, Action::Shoot)?;
    if ctx.args.players.len() != 1 {
        return Err(ActionError::WrongInput(SELECT_ONE_PLAYER));
    }

    ctx.consume(Item::Arrow);
    Ok(vec![ctx.queue_now(Effect::KillPlayers)])
}

pub(super) fn archer_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let arrows = ctx.items(Item::Arrow);
    if arrows == 0 {
        return Vec::new();
    }
    vec![AbilityInfo {
        purpose: Purpose::Main(MainRole::Archer),
        action: Action::Shoot,
        eligible: Eligible::players(ctx.state.alive_ids()),
        remaining: arrows,
    }]
}

/// Poison takes hold after the configured delay.
pub(super) fn poisoner(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    ctx.require_item(Item::Poison)?;
    require_tag(action, Action::Poison)?;
    ctx.require_inputs(1, 0, SELECT_ONE_LOCATION)?;

    ctx.consume(Item::Poison);
    let time = ctx.now + Duration::minutes(ctx.config.poison_delay_minutes);
    Ok(vec![PlannedAction::queued(
        time,
        Effect::KillPlayers,
        ctx.payload(),
    )])
}

pub(super) fn poisoner_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let poison = ctx.items(Item::Poison);
    if poison == 0 || !ctx.phase_is(DayPhase::Evening) {
        return Vec::new();
    }
    vec![AbilityInfo {
        purpose: Purpose::Main(MainRole::Poisoner),
        action: Action::Poison,
        eligible: Eligible::locations(ctx.houses_and_bridges(|_| true)),
        remaining: poison,
    }]
}

/// Soaking is unlimited; burning ignites every soaked house at once.
pub(super) fn arsonist(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    match action {
        Action::Soak => {
            ctx.require_inputs(1, 0, SELECT_ONE_LOCATION)?;
            ctx.require_house(ctx.args.locations[0])?;
            Ok(vec![ctx.queue_now(Effect::SoakHouse)])
        }
        Action::Burn => {
            ctx.require_inputs(0, 0, WRONG_AMOUNT_OF_INPUTS)?;
            Ok(vec![ctx.queue_now(Effect::BurnHouse)])
        }
        _ => Err(ActionError::NoSuchAction(ACTION_DOES_NOT_EXIST)),
    }
}

pub(super) fn arsonist_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    if !ctx.phase_is(DayPhase::Evening) {
        return Vec::new();
    }

    let soakable: Vec<_> = ctx
        .state
        .locations()
        .filter(|location| {
            location
                .as_house()
                .is_some_and(|house| house.state() == HouseState::Repaired)
        })
        .map(|location| location.id)
        .collect();
    let has_soaked = ctx.state.locations().any(|location| {
        location
            .as_house()
            .is_some_and(|house| house.state() == HouseState::Soaked)
    });

    let purpose = Purpose::Main(MainRole::Arsonist);
    let mut info = vec![AbilityInfo {
        purpose,
        action: Action::Soak,
        eligible: Eligible::locations(soakable),
        remaining: 1,
    }];
    if has_soaked {
        info.push(AbilityInfo {
            purpose,
            action: Action::Burn,
            eligible: Eligible::default(),
            remaining: 1,
        });
    }
    info
}
