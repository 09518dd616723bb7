//! Hooks run when the clock enters DAY.

use async_trait::async_trait;
use tracing::debug;

use werewolf_core::{Clock, DayPhase, Job, KillCause, VoteType};

use super::{HookContext, HookCriticality, PhaseHook};
use crate::api::Result;

/// Resolves the night: runs the night's queue, then kills everyone still marked.
pub struct NightKillHook;

#[async_trait]
impl PhaseHook for NightKillHook {
    fn name(&self) -> &'static str {
        "night_kill"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Critical
    }

    fn should_trigger(&self, clock: Clock) -> bool {
        clock.phase == DayPhase::Day
    }

    async fn run(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        ctx.drain().await?;
        ctx.kill_marked(KillCause::Night).await?;
        ctx.drain().await?;
        Ok(())
    }
}

/// Starts the new day: protection wears off, night messages become
/// readable, everyone walks home and burned houses rebuild.
pub struct DawnHook;

#[async_trait]
impl PhaseHook for DawnHook {
    fn name(&self) -> &'static str {
        "dawn"
    }

    fn should_trigger(&self, clock: Clock) -> bool {
        clock.phase == DayPhase::Day
    }

    async fn run(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        ctx.state.clear_protection();
        ctx.state.unlock_messages();
        ctx.state.send_everyone_home();
        ctx.state.rebuild_houses()?;
        Ok(())
    }
}

/// Opens the mayor and alpha wolf elections while those jobs are vacant.
pub struct ElectionHook;

#[async_trait]
impl PhaseHook for ElectionHook {
    fn name(&self) -> &'static str {
        "elections"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn should_trigger(&self, clock: Clock) -> bool {
        clock.phase == DayPhase::Day
    }

    async fn run(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let instance = ctx.state.id;

        if ctx.state.job_holder(Job::Mayor).is_none()
            && ctx.votes.ongoing_of(instance, VoteType::Mayor)?.is_empty()
        {
            ctx.start_vote(VoteType::Mayor)?;
        }

        if ctx.state.job_holder(Job::AlphaWolf).is_none() {
            if ctx.votes.ongoing_of(instance, VoteType::AlphaWolf)?.is_empty() {
                ctx.start_vote(VoteType::AlphaWolf)?;
            } else {
                debug!(
                    target: "runtime::hooks",
                    instance = %instance,
                    "Alpha wolf vote still running"
                );
            }
        }
        Ok(())
    }
}
