use super::{EffectContext, EffectError, EffectTransition, require_players};
use crate::state::{ActionMessage, InstanceState, MessageKind, PlayerFlags};

/// Shields listed players from kills until the next DAY.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProtectPlayers;

impl EffectTransition for ProtectPlayers {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        require_players(state, &ctx.args().players)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        for target in &ctx.args().players {
            state
                .require_player_mut(*target)?
                .flags
                .insert(PlayerFlags::PROTECTED);
            state.push_message(
                ActionMessage::to(*target, MessageKind::ProtectPlayer).with_action(ctx.action_id),
            );
        }
        Ok(())
    }
}

/// Removes the death mark from `players[0]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HealPlayer;

impl EffectTransition for HealPlayer {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        state.require_player(ctx.first_player()?)?;
        Ok(())
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let patient = ctx.first_player()?;
        state
            .require_player_mut(patient)?
            .flags
            .remove(PlayerFlags::MARKED);
        state.push_message(
            ActionMessage::to(patient, MessageKind::HealedPlayer).with_action(ctx.action_id),
        );
        Ok(())
    }
}

/// Brings listed dead players back to life.
#[derive(Clone, Copy, Debug, Default)]
pub struct RevivePlayers;

impl EffectTransition for RevivePlayers {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        ctx.first_player()?;
        require_players(state, &ctx.args().players)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let mut broadcast =
            ActionMessage::broadcast(MessageKind::RevivePlayers).with_action(ctx.action_id);
        for target in &ctx.args().players {
            state.revive_player(*target)?;
            state.push_message(
                ActionMessage::to(*target, MessageKind::YouHaveBeenRevived)
                    .with_action(ctx.action_id)
                    .unlocked(),
            );
            broadcast = broadcast.with_field(target);
        }
        state.push_message(broadcast.unlocked());
        Ok(())
    }
}
