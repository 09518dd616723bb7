//! Hooks around the daily lynch vote.

use async_trait::async_trait;

use werewolf_core::{Clock, DayPhase, VoteType};

use super::{HookContext, HookCriticality, PhaseHook};
use crate::api::Result;

/// Entering VOTE: the lynch vote opens and the mayor election closes.
pub struct LynchOpeningHook;

#[async_trait]
impl PhaseHook for LynchOpeningHook {
    fn name(&self) -> &'static str {
        "lynch_opening"
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Critical
    }

    fn should_trigger(&self, clock: Clock) -> bool {
        clock.phase == DayPhase::Vote
    }

    async fn run(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        ctx.start_vote(VoteType::Lynch)?;
        ctx.end_votes(VoteType::Mayor).await?;
        ctx.drain().await?;
        Ok(())
    }
}

/// Entering EXECUTION: the lynch vote closes and its picks are marked
/// by the game master.
pub struct LynchClosingHook;

#[async_trait]
impl PhaseHook for LynchClosingHook {
    fn name(&self) -> &'static str {
        "lynch_closing"
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Critical
    }

    fn should_trigger(&self, clock: Clock) -> bool {
        clock.phase == DayPhase::Execution
    }

    async fn run(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        ctx.end_votes(VoteType::Lynch).await?;
        Ok(())
    }
}
