//! Effects that change who holds which role or job.

use super::{EffectContext, EffectError, EffectTransition, require_players};
use crate::role::Job;
use crate::state::{ActionMessage, InstanceState, MessageKind, PlayerFlags};

/// The actor takes over the main role of `players[0]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChangeRole;

impl EffectTransition for ChangeRole {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        state.require_player(ctx.actor())?;
        let donor = ctx.first_player()?;
        state
            .require_player(donor)?
            .main_role
            .ok_or(EffectError::NoMainRole(donor))?;
        Ok(())
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let donor = ctx.first_player()?;
        let role = state
            .require_player(donor)?
            .main_role
            .ok_or(EffectError::NoMainRole(donor))?;

        state.require_player_mut(ctx.actor())?.assign_main_role(role);

        state.push_message(
            ActionMessage::to(ctx.actor(), MessageKind::ChangedRole)
                .with_field(role)
                .with_action(ctx.action_id)
                .unlocked(),
        );
        state.push_message(
            ActionMessage::broadcast(MessageKind::ChangedRoleGlobal)
                .with_field(donor)
                .with_action(ctx.action_id)
                .unlocked(),
        );
        Ok(())
    }
}

/// Appoints `players[0]` as mayor.
#[derive(Clone, Copy, Debug, Default)]
pub struct NewMayor;

impl EffectTransition for NewMayor {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        state.require_player(ctx.first_player()?)?;
        Ok(())
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let mayor = ctx.first_player()?;
        let player = state.require_player_mut(mayor)?;
        if !player.has_job(Job::Mayor) {
            player.add_job(Job::Mayor)?;
        }
        state.push_message(
            ActionMessage::broadcast(MessageKind::NewMayor)
                .with_field(mayor)
                .with_action(ctx.action_id)
                .unlocked(),
        );
        Ok(())
    }
}

/// Mayor's verdict on tied lynch candidates: marks the chosen players and
/// settles every undecided slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct MayorDecide;

impl EffectTransition for MayorDecide {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        require_players(state, &ctx.args().players)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let mut broadcast =
            ActionMessage::broadcast(MessageKind::MayorDecide).with_action(ctx.action_id);
        for chosen in &ctx.args().players {
            let player = state.require_player_mut(*chosen)?;
            if player.is_alive() {
                player.flags.insert(PlayerFlags::MARKED);
            }
            broadcast = broadcast.with_field(chosen);
        }
        state.undecided_lynches = 0;
        state.push_message(broadcast.unlocked());
        Ok(())
    }
}
