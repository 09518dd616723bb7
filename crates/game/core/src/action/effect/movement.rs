use super::{EffectContext, EffectError, EffectTransition, require_players};
use crate::state::{ActionMessage, InstanceState, MessageKind};

/// Moves the actor and every listed player to `locations[0]`.
///
/// Players moved by someone else are told where they ended up; the actor is
/// not. An actor that is not a player (the game master) moves only the
/// listed players.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveToLocation;

impl EffectTransition for MoveToLocation {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let destination = ctx.first_location()?;
        if state.location(destination).is_none() {
            return Err(EffectError::UnknownLocation(destination));
        }
        require_players(state, &ctx.args().players)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let destination = ctx.first_location()?;
        let kind = match state.location(destination) {
            Some(location) if location.is_bridge() => MessageKind::MoveToBridge,
            Some(_) => MessageKind::MoveToHouse,
            None => return Err(EffectError::UnknownLocation(destination)),
        };

        if state.player(ctx.actor()).is_some() {
            state.move_player(ctx.actor(), destination)?;
        }
        for moved in &ctx.args().players {
            state.move_player(*moved, destination)?;
            state.push_message(
                ActionMessage::to(*moved, kind)
                    .with_field(destination)
                    .with_action(ctx.action_id),
            );
        }
        Ok(())
    }
}
