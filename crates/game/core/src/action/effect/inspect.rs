use super::{EffectContext, EffectError, EffectTransition, require_players};
use crate::state::{ActionMessage, InstanceState, MessageKind};

/// Tells the actor the main role of each listed player.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeeRole;

impl EffectTransition for SeeRole {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        state.require_player(ctx.actor())?;
        require_players(state, &ctx.args().players)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        for target in &ctx.args().players {
            let role = state
                .require_player(*target)?
                .main_role
                .ok_or(EffectError::NoMainRole(*target))?;
            state.push_message(
                ActionMessage::to(ctx.actor(), MessageKind::SeeRole)
                    .with_field(target)
                    .with_field(role)
                    .with_action(ctx.action_id),
            );
        }
        Ok(())
    }
}

/// Tells the actor the character each listed player shows to investigators.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeeCharacter;

impl EffectTransition for SeeCharacter {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        state.require_player(ctx.actor())?;
        require_players(state, &ctx.args().players)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        for target in &ctx.args().players {
            let character = state.require_player(*target)?.character();
            state.push_message(
                ActionMessage::to(ctx.actor(), MessageKind::SeeCharacter)
                    .with_field(target)
                    .with_field(character)
                    .with_action(ctx.action_id),
            );
        }
        Ok(())
    }
}
