use super::{EffectContext, EffectError, EffectTransition};
use crate::location::{HouseError, HouseMethod, HouseState};
use crate::state::{ActionMessage, InstanceState, LocationId, MessageKind, PlayerFlags};

/// Checks that `method` is legal on every listed house; bridges are skipped.
fn require_method(
    state: &InstanceState,
    locations: &[LocationId],
    method: HouseMethod,
) -> Result<(), EffectError> {
    for id in locations {
        let location = state
            .location(*id)
            .ok_or(EffectError::UnknownLocation(*id))?;
        let Some(house) = location.as_house() else {
            continue;
        };
        if !house.can(method) {
            return Err(HouseError::WrongStateMethod {
                state: house.state(),
                method,
            }
            .into());
        }
    }
    Ok(())
}

/// Douses every listed house in fuel.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoakHouse;

impl EffectTransition for SoakHouse {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        require_method(state, &ctx.args().locations, HouseMethod::Soak)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        for id in &ctx.args().locations {
            if let Some(house) = state.location_mut(*id).and_then(|l| l.as_house_mut()) {
                house.soak()?;
            }
        }
        Ok(())
    }
}

/// Sets soaked houses alight, marking everyone inside.
///
/// With no listed locations every soaked house of the instance burns.
#[derive(Clone, Copy, Debug, Default)]
pub struct BurnHouse;

impl BurnHouse {
    fn targets(state: &InstanceState, ctx: &EffectContext<'_>) -> Vec<LocationId> {
        if !ctx.args().locations.is_empty() {
            return ctx.args().locations.clone();
        }
        state
            .locations()
            .filter(|location| {
                location
                    .as_house()
                    .is_some_and(|house| house.state() == HouseState::Soaked)
            })
            .map(|location| location.id)
            .collect()
    }
}

impl EffectTransition for BurnHouse {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        let targets = Self::targets(state, ctx);
        for id in &targets {
            let location = state
                .location(*id)
                .ok_or(EffectError::UnknownLocation(*id))?;
            if !location.is_house() {
                return Err(EffectError::NotAHouse(*id));
            }
        }
        require_method(state, &targets, HouseMethod::Burn)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        for id in Self::targets(state, ctx) {
            if let Some(house) = state.location_mut(id).and_then(|l| l.as_house_mut()) {
                house.burn()?;
            }
            for visitor in state.visitors(id) {
                let player = state.require_player_mut(visitor)?;
                if !player.is_protected() {
                    player.flags.insert(PlayerFlags::MARKED);
                }
            }
            state.push_message(
                ActionMessage::broadcast(MessageKind::HouseBurned)
                    .with_field(id)
                    .with_action(ctx.action_id),
            );
        }
        Ok(())
    }
}

/// Repairs every listed house.
#[derive(Clone, Copy, Debug, Default)]
pub struct CleanHouse;

impl EffectTransition for CleanHouse {
    fn pre_validate(&self, state: &InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        require_method(state, &ctx.args().locations, HouseMethod::Repair)
    }

    fn apply(&self, state: &mut InstanceState, ctx: &EffectContext<'_>) -> Result<(), EffectError> {
        for id in &ctx.args().locations {
            if let Some(house) = state.location_mut(*id).and_then(|l| l.as_house_mut()) {
                house.repair()?;
            }
        }
        Ok(())
    }
}
