//! House lifecycle.
//!
//! Transitions are a pure table keyed by `(state, method)`; [`House`] only
//! stores the current tag and the days-in-state counter.

use crate::error::{ErrorKind, ErrorSeverity, GameError};

/// Days a burned house needs to be rebuilt.
pub const REBUILD_DAYS: u32 = 3;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HouseState {
    #[default]
    Repaired,
    Soaked,
    Burned,
    Cleaned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HouseMethod {
    Soak,
    Burn,
    Build,
    Repair,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HouseError {
    #[error("cannot {method} a house that is {state}")]
    WrongStateMethod {
        state: HouseState,
        method: HouseMethod,
    },
}

impl GameError for HouseError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::State
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "HOUSE_WRONG_STATE_METHOD"
    }
}

/// Outcome of applying one method to one state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// Stay in the current state, counter untouched.
    Stay,
    /// Enter a new state, counter reset.
    Enter(HouseState),
    /// Count one more day in the current state.
    Tick,
    /// Enter a new state and immediately apply `repair` there.
    EnterThenRepair(HouseState),
}

fn step(state: HouseState, method: HouseMethod) -> Result<Step, HouseError> {
    use HouseMethod::*;
    use HouseState::*;

    let step = match (state, method) {
        (Repaired, Soak) => Step::Enter(Soaked),
        (Repaired, Repair) => Step::Stay,

        (Soaked, Soak) => Step::Stay,
        (Soaked, Burn) => Step::Enter(Burned),
        (Soaked, Repair) => Step::EnterThenRepair(Cleaned),

        (Burned, Build) => Step::Tick,
        (Burned, Repair) => Step::Enter(Repaired),

        (Cleaned, Repair) => Step::Enter(Repaired),

        (state, method) => return Err(HouseError::WrongStateMethod { state, method }),
    };
    Ok(step)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct House {
    state: HouseState,
    days_in_state: u32,
}

impl House {
    pub const fn new() -> Self {
        Self {
            state: HouseState::Repaired,
            days_in_state: 0,
        }
    }

    /// Restores a persisted house.
    pub const fn from_parts(state: HouseState, days_in_state: u32) -> Self {
        Self {
            state,
            days_in_state,
        }
    }

    pub const fn state(&self) -> HouseState {
        self.state
    }

    pub const fn days_in_state(&self) -> u32 {
        self.days_in_state
    }

    pub fn soak(&mut self) -> Result<(), HouseError> {
        self.apply(HouseMethod::Soak)
    }

    pub fn burn(&mut self) -> Result<(), HouseError> {
        self.apply(HouseMethod::Burn)
    }

    /// Advances rebuilding by one day; the third day restores the house.
    pub fn build(&mut self) -> Result<(), HouseError> {
        self.apply(HouseMethod::Build)
    }

    pub fn repair(&mut self) -> Result<(), HouseError> {
        self.apply(HouseMethod::Repair)
    }

    pub fn can(&self, method: HouseMethod) -> bool {
        step(self.state, method).is_ok()
    }

    fn apply(&mut self, method: HouseMethod) -> Result<(), HouseError> {
        match step(self.state, method)? {
            Step::Stay => {}
            Step::Enter(next) => self.enter(next),
            Step::Tick => {
                self.days_in_state += 1;
                if self.days_in_state >= REBUILD_DAYS {
                    self.apply(HouseMethod::Repair)?;
                }
            }
            Step::EnterThenRepair(next) => {
                self.enter(next);
                self.apply(HouseMethod::Repair)?;
            }
        }
        Ok(())
    }

    fn enter(&mut self, state: HouseState) {
        self.state = state;
        self.days_in_state = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soak_burn_and_rebuild_round_trip() {
        let mut house = House::new();
        house.soak().unwrap();
        assert_eq!(house.state(), HouseState::Soaked);
        house.burn().unwrap();
        assert_eq!(house.state(), HouseState::Burned);

        house.build().unwrap();
        house.build().unwrap();
        assert_eq!(house.state(), HouseState::Burned);
        assert_eq!(house.days_in_state(), 2);

        house.build().unwrap();
        assert_eq!(house.state(), HouseState::Repaired);
        assert_eq!(house.days_in_state(), 0);
    }

    #[test]
    fn repairing_a_soaked_house_passes_through_cleaned() {
        let mut house = House::new();
        house.soak().unwrap();
        house.repair().unwrap();
        assert_eq!(house.state(), HouseState::Repaired);
        assert_eq!(house.days_in_state(), 0);
    }

    #[test]
    fn repair_skips_the_rebuild_timer() {
        let mut house = House::from_parts(HouseState::Burned, 1);
        house.repair().unwrap();
        assert_eq!(house, House::new());
    }

    #[test]
    fn illegal_methods_are_rejected() {
        let mut house = House::new();
        assert_eq!(
            house.burn(),
            Err(HouseError::WrongStateMethod {
                state: HouseState::Repaired,
                method: HouseMethod::Burn
            })
        );
        assert!(house.build().is_err());

        let mut cleaned = House::from_parts(HouseState::Cleaned, 0);
        assert!(cleaned.soak().is_err());
        assert!(cleaned.burn().is_err());
        assert!(cleaned.build().is_err());
        cleaned.repair().unwrap();
        assert_eq!(cleaned.state(), HouseState::Repaired);

        let mut burned = House::from_parts(HouseState::Burned, 0);
        assert!(burned.soak().is_err());
        assert!(burned.burn().is_err());
    }

    #[test]
    fn soak_is_idempotent_and_keeps_counter() {
        let mut house = House::from_parts(HouseState::Soaked, 2);
        house.soak().unwrap();
        assert_eq!(house.state(), HouseState::Soaked);
        assert_eq!(house.days_in_state(), 2);
    }
}
