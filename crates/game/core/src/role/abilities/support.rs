use super::{AbilityContext, AbilityInfo, Eligible, InfoContext, require_tag};
use crate::action::{Action, Effect, PlannedAction};
use crate::role::error::{SELECT_ONE_PLAYER, TARGET_STILL_ALIVE};
use crate::role::{ActionError, Item, MainRole, Purpose};
use crate::state::{DayPhase, PlayerIdentifier};

impl AbilityContext<'_> {
    fn require_dead_target(&self, target: PlayerIdentifier) -> Result<(), ActionError> {
        match self.state.player(target) {
            Some(player) if player.is_alive() => {
                Err(ActionError::NotAllowedToPerformAction(TARGET_STILL_ALIVE))
            }
            Some(_) => Ok(()),
            None => Err(ActionError::NoSuchPlayer(target)),
        }
    }
}

pub(super) fn guardian_angel(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_item(Item::Guard)?;
    require_tag(action, Action::Protect)?;
    ctx.require_alive()?;
    if ctx.args.players.len() != 1 {
        return Err(ActionError::WrongInput(SELECT_ONE_PLAYER));
    }

    ctx.consume(Item::Guard);
    Ok(vec![ctx.queue_now(Effect::ProtectPlayers)])
}

pub(super) fn guardian_angel_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let guards = ctx.items(Item::Guard);
    if guards == 0 || !ctx.phase_is(DayPhase::Evening) {
        return Vec::new();
    }
    vec![AbilityInfo {
        purpose: Purpose::Main(MainRole::GuardianAngel),
        action: Action::Protect,
        eligible: Eligible::players(ctx.state.alive_ids()),
        remaining: guards,
    }]
}

pub(super) fn healer(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    ctx.require_item(Item::Medkit)?;
    require_tag(action, Action::Heal)?;
    if ctx.args.players.len() != 1 {
        return Err(ActionError::WrongInput(SELECT_ONE_PLAYER));
    }

    ctx.consume(Item::Medkit);
    Ok(vec![ctx.queue_now(Effect::HealPlayer)])
}

/// Healing is offered in the morning, for players marked overnight.
pub(super) fn healer_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let medkits = ctx.items(Item::Medkit);
    if medkits == 0 || !ctx.phase_is(DayPhase::Morning) {
        return Vec::new();
    }
    vec![AbilityInfo {
        purpose: Purpose::Main(MainRole::Healer),
        action: Action::Heal,
        eligible: Eligible::players(ctx.state.marked_ids()),
        remaining: medkits,
    }]
}

pub(super) fn medium(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    ctx.require_item(Item::Revive)?;
    require_tag(action, Action::Revive)?;
    if ctx.args.players.len() != 1 {
        return Err(ActionError::WrongInput(SELECT_ONE_PLAYER));
    }
    ctx.require_dead_target(ctx.args.players[0])?;

    ctx.consume(Item::Revive);
    Ok(vec![ctx.run_now(Effect::RevivePlayers)])
}

pub(super) fn medium_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let revives = ctx.items(Item::Revive);
    if revives == 0 {
        return Vec::new();
    }
    vec![AbilityInfo {
        purpose: Purpose::Main(MainRole::Medium),
        action: Action::Revive,
        eligible: Eligible::players(ctx.state.dead_ids()),
        remaining: revives,
    }]
}

/// Takes over the main role of a dead player.
pub(super) fn graverobber(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    ctx.require_item(Item::Grave)?;
    require_tag(action, Action::RobGrave)?;
    ctx.require_inputs(0, 1, SELECT_ONE_PLAYER)?;
    ctx.require_dead_target(ctx.args.players[0])?;

    ctx.consume(Item::Grave);
    Ok(vec![ctx.run_now(Effect::ChangeRole)])
}

pub(super) fn graverobber_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let graves = ctx.items(Item::Grave);
    if graves == 0 {
        return Vec::new();
    }
    vec![AbilityInfo {
        purpose: Purpose::Main(MainRole::Graverobber),
        action: Action::RobGrave,
        eligible: Eligible::players(ctx.state.dead_ids()),
        remaining: graves,
    }]
}
