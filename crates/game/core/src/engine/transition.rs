//! Effect transition dispatch.

use crate::action::effect::{
    BurnHouse, ChangeRole, CleanHouse, HealPlayer, KillMarkedPlayers, KillPlayers, MayorDecide,
    MoveToLocation, NewMayor, ProtectPlayers, RevivePlayers, SeeCharacter, SeeRole, SoakHouse,
};
use crate::action::{Effect, EffectContext, EffectError, EffectTransition};
use crate::state::InstanceState;

use super::errors::{TransitionPhase, TransitionPhaseError};

/// Runs a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the instance state
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut InstanceState,
    ctx: &EffectContext<'_>,
) -> Result<(), TransitionPhaseError<EffectError>>
where
    T: EffectTransition,
{
    transition
        .pre_validate(state, ctx)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(state, ctx)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, ctx)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
}

/// Routes an effect to its transition. Composites run their children in
/// order, each with the parent's context.
pub(super) fn execute_effect(
    effect: &Effect,
    state: &mut InstanceState,
    ctx: &EffectContext<'_>,
) -> Result<(), (&'static str, TransitionPhaseError<EffectError>)> {
    let name: &'static str = effect.into();
    let result = match effect {
        Effect::KillPlayers => drive_transition(&KillPlayers, state, ctx),
        Effect::SeeRole => drive_transition(&SeeRole, state, ctx),
        Effect::SeeCharacter => drive_transition(&SeeCharacter, state, ctx),
        Effect::ChangeRole => drive_transition(&ChangeRole, state, ctx),
        Effect::ProtectPlayers => drive_transition(&ProtectPlayers, state, ctx),
        Effect::HealPlayer => drive_transition(&HealPlayer, state, ctx),
        Effect::RevivePlayers => drive_transition(&RevivePlayers, state, ctx),
        Effect::MoveToLocation => drive_transition(&MoveToLocation, state, ctx),
        Effect::NewMayor => drive_transition(&NewMayor, state, ctx),
        Effect::MayorDecide => drive_transition(&MayorDecide, state, ctx),
        Effect::KillMarkedPlayers(cause) => {
            drive_transition(&KillMarkedPlayers { cause: *cause }, state, ctx)
        }
        Effect::SoakHouse => drive_transition(&SoakHouse, state, ctx),
        Effect::BurnHouse => drive_transition(&BurnHouse, state, ctx),
        Effect::CleanHouse => drive_transition(&CleanHouse, state, ctx),
        Effect::Composite(children) => {
            for child in children {
                execute_effect(child, state, ctx)?;
            }
            Ok(())
        }
    };
    result.map_err(|error| (name, error))
}
