use super::{
    EffectContext, EffectError, EffectTransition, KillCause, require_locations, require_players,
};
use crate::role::Job;
use crate::state::{ActionMessage, InstanceState, MessageKind, PlayerFlags};

/// Marks targets for death at the next kill step.
///
/// Targets are the listed players plus everyone visiting a listed location.
/// Protected players are skipped, and an alpha wolf never marks werewolves.
#[derive(Clone, Copy, Debug, Default)]
pub struct KillPlayers;

impl EffectTransition for KillPlayers {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        require_players(state, &ctx.args().players)?;
        require_locations(state, &ctx.args().locations)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let spare_wolves = state
            .player(ctx.actor())
            .is_some_and(|actor| actor.has_job(Job::AlphaWolf));

        let mut targets = ctx.args().players.clone();
        for location in &ctx.args().locations {
            targets.extend(state.visitors(*location));
        }

        for target in targets {
            let Some(player) = state.player_mut(target) else {
                continue;
            };
            if !player.is_alive() || player.is_protected() {
                continue;
            }
            if spare_wolves && player.is_werewolf() {
                continue;
            }
            player.flags.insert(PlayerFlags::MARKED);
        }
        Ok(())
    }
}

/// Kills every listed player that is still alive and announces the victims.
#[derive(Clone, Copy, Debug)]
pub struct KillMarkedPlayers {
    pub cause: KillCause,
}

impl EffectTransition for KillMarkedPlayers {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        require_players(state, &ctx.args().players)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let kind = match self.cause {
            KillCause::Night => MessageKind::NightKillBroadcast,
            KillCause::Lynch => MessageKind::LynchKillBroadcast,
        };
        let mut broadcast = ActionMessage::broadcast(kind).with_action(ctx.action_id);
        let mut killed = 0;

        for victim in &ctx.args().players {
            if !state.require_player(*victim)?.is_alive() {
                continue;
            }
            state.kill_player(*victim)?;
            broadcast = broadcast.with_field(victim);
            killed += 1;
        }

        if killed > 0 {
            state.push_message(broadcast);
        }
        Ok(())
    }
}
