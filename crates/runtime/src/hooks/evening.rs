//! Hooks run when the clock enters EVENING.

use async_trait::async_trait;

use werewolf_core::{Clock, DayPhase, KillCause, role};

use super::{HookContext, HookCriticality, PhaseHook};
use crate::api::Result;

/// Carries out the lynch: runs the day's queue (including the mayor's tie
/// breaks), then kills everyone marked.
pub struct LynchKillHook;

#[async_trait]
impl PhaseHook for LynchKillHook {
    fn name(&self) -> &'static str {
        "lynch_kill"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Critical
    }

    fn should_trigger(&self, clock: Clock) -> bool {
        clock.phase == DayPhase::Evening
    }

    async fn run(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        ctx.drain().await?;
        ctx.kill_marked(KillCause::Lynch).await?;
        ctx.drain().await?;
        Ok(())
    }
}

/// Refills every survivor's ability items for the coming night and drops
/// the lynch ties the mayor left open.
pub struct ReplenishHook;

#[async_trait]
impl PhaseHook for ReplenishHook {
    fn name(&self) -> &'static str {
        "replenish"
    }

    fn should_trigger(&self, clock: Clock) -> bool {
        clock.phase == DayPhase::Evening
    }

    async fn run(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        role::replenish_all(ctx.state, ctx.config);
        ctx.state.tied_players.clear();
        ctx.state.undecided_lynches = 0;
        Ok(())
    }
}
