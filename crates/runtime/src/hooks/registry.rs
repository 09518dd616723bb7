//! Hook registry for managing and executing phase hooks.

use std::sync::Arc;

use tracing::{debug, error};

use super::{HookContext, HookCriticality, PhaseHook};
use crate::api::{Result, RuntimeError};

/// Registry that runs the phase hooks of every phase advance in priority order.
pub struct HookRegistry {
    hooks: Arc<[Arc<dyn PhaseHook>]>,
}

impl HookRegistry {
    /// Creates a registry; hooks are sorted by priority (lower values first).
    pub fn new(mut hooks: Vec<Arc<dyn PhaseHook>>) -> Self {
        hooks.sort_by_key(|h| h.priority());
        Self {
            hooks: hooks.into(),
        }
    }

    /// Creates a registry with the phase steps of a regular game.
    pub fn default_hooks() -> Self {
        use super::{
            DawnHook, ElectionHook, LynchClosingHook, LynchKillHook, LynchOpeningHook,
            NightKillHook, NightfallHook, ReplenishHook,
        };

        Self::new(vec![
            Arc::new(NightKillHook) as Arc<dyn PhaseHook>,
            Arc::new(DawnHook),
            Arc::new(ElectionHook),
            Arc::new(LynchOpeningHook),
            Arc::new(LynchClosingHook),
            Arc::new(LynchKillHook),
            Arc::new(ReplenishHook),
            Arc::new(NightfallHook),
        ])
    }

    /// Runs every hook that triggers for the context's current clock.
    ///
    /// # Error Handling
    ///
    /// - `Critical`: returns the error immediately; later hooks do not run
    /// - `Important`: logs the error and continues with the next hook
    /// - `Optional`: logs at debug level and continues silently
    pub async fn run_phase(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let clock = ctx.state.clock;
        for hook in self.hooks.iter() {
            if !hook.should_trigger(clock) {
                continue;
            }
            debug!(
                target: "runtime::hooks",
                hook = hook.name(),
                instance = %ctx.state.id,
                day = clock.day,
                phase = %clock.phase,
                "Running phase hook"
            );
            if let Err(e) = hook.run(ctx).await {
                self.handle_hook_error(hook.as_ref(), e)?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns an iterator over hook names and priorities (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|h| (h.name(), h.priority()))
    }

    /// Returns Ok(()) for Important/Optional hooks, Err for Critical hooks.
    fn handle_hook_error(&self, hook: &dyn PhaseHook, error: RuntimeError) -> Result<()> {
        match hook.criticality() {
            HookCriticality::Critical => {
                error!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "critical",
                    error = %error,
                    "Critical hook failed, aborting phase advance"
                );
                Err(error)
            }
            HookCriticality::Important => {
                error!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "important",
                    error = %error,
                    "Hook failed, continuing"
                );
                Ok(())
            }
            HookCriticality::Optional => {
                debug!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "optional",
                    error = %error,
                    "Optional hook failed"
                );
                Ok(())
            }
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::default_hooks()
    }
}
