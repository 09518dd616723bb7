use async_trait::async_trait;

use werewolf_core::{Clock, DayPhase};

use super::{HookContext, HookCriticality, PhaseHook};
use crate::api::Result;

/// Runs whatever was queued during the evening before the night begins.
pub struct NightfallHook;

#[async_trait]
impl PhaseHook for NightfallHook {
    fn name(&self) -> &'static str {
        "nightfall"
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Critical
    }

    fn should_trigger(&self, clock: Clock) -> bool {
        clock.phase == DayPhase::Night
    }

    async fn run(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        ctx.drain().await?;
        Ok(())
    }
}
