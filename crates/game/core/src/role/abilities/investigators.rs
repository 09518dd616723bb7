use super::{AbilityContext, AbilityInfo, Eligible, InfoContext, require_tag};
use crate::action::{Action, Effect, PlannedAction};
use crate::role::error::SELECT_ONE_PLAYER;
use crate::role::{ActionError, Item, MainRole, Purpose};
use crate::state::DayPhase;

pub(super) fn clairvoyant(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    ctx.require_item(Item::Seen)?;
    require_tag(action, Action::ClairvoyantSeeRole)?;
    ctx.require_inputs(0, 1, SELECT_ONE_PLAYER)?;

    ctx.consume(Item::Seen);
    Ok(vec![ctx.queue_now(Effect::SeeRole)])
}

pub(super) fn clairvoyant_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let seen = ctx.items(Item::Seen);
    if seen == 0 || !ctx.phase_is(DayPhase::Evening) {
        return Vec::new();
    }
    vec![AbilityInfo {
        purpose: Purpose::Main(MainRole::Clairvoyant),
        action: Action::ClairvoyantSeeRole,
        eligible: Eligible::players(ctx.state.player_ids()),
        remaining: seen,
    }]
}

/// Any number of players may be investigated with a single use.
pub(super) fn private_investigator(
    ctx: &mut AbilityContext<'_>,
    action: Action,
) -> Result<Vec<PlannedAction>, ActionError> {
    ctx.require_alive()?;
    ctx.require_item(Item::Investigation)?;
    require_tag(action, Action::PrivateInvestigate)?;

    ctx.consume(Item::Investigation);
    Ok(vec![ctx.queue_now(Effect::SeeCharacter)])
}

pub(super) fn private_investigator_information(ctx: &InfoContext<'_>) -> Vec<AbilityInfo> {
    let investigations = ctx.items(Item::Investigation);
    if investigations == 0 || !ctx.phase_is(DayPhase::Evening) {
        return Vec::new();
    }
    vec![AbilityInfo {
        purpose: Purpose::Main(MainRole::PrivateInvestigator),
        action: Action::PrivateInvestigate,
        eligible: Eligible::players(ctx.state.player_ids()),
        remaining: investigations,
    }]
}
