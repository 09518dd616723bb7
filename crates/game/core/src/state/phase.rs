//! Day/night cycle tracking.

use crate::config::PhaseSchedule;

/// Segment of the in-game day during which certain abilities and votes are legal.
///
/// Phases cycle NIGHT → MORNING → DAY → VOTE → EXECUTION → EVENING → NIGHT.
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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DayPhase {
    #[default]
    Night,
    Morning,
    Day,
    Vote,
    Execution,
    Evening,
}

impl DayPhase {
    pub const ALL: [DayPhase; 6] = [
        DayPhase::Night,
        DayPhase::Morning,
        DayPhase::Day,
        DayPhase::Vote,
        DayPhase::Execution,
        DayPhase::Evening,
    ];

    const fn index(self) -> usize {
        match self {
            DayPhase::Night => 0,
            DayPhase::Morning => 1,
            DayPhase::Day => 2,
            DayPhase::Vote => 3,
            DayPhase::Execution => 4,
            DayPhase::Evening => 5,
        }
    }

    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub const fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Derives the phase that is active at `minute` (minutes since midnight).
    pub fn from_minute_of_day(minute: u32, schedule: &PhaseSchedule) -> Self {
        if minute < schedule.end_of_night {
            DayPhase::Night
        } else if minute < schedule.end_of_morning {
            DayPhase::Morning
        } else if minute < schedule.end_of_day {
            DayPhase::Day
        } else if minute < schedule.end_of_vote {
            DayPhase::Vote
        } else if minute < schedule.end_of_execution {
            DayPhase::Execution
        } else {
            DayPhase::Evening
        }
    }
}

/// Day counter and current phase of one instance.
///
/// Day 0 is the pre-game stretch before the first MORNING; phase side
/// effects only apply from day 1 onwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clock {
    pub day: u32,
    pub phase: DayPhase,
}

impl Clock {
    pub const fn new(day: u32, phase: DayPhase) -> Self {
        Self { day, phase }
    }

    /// Moves to the next phase; entering MORNING starts a new day.
    pub fn advance(&mut self) -> DayPhase {
        self.phase = self.phase.next();
        if self.phase == DayPhase::Morning {
            self.day += 1;
        }
        self.phase
    }

    /// True once the first in-game day has begun.
    pub const fn has_begun(&self) -> bool {
        self.day >= 1
    }

    /// Game speed grows by one every `interval` days, starting at 0 on day 1.
    pub fn game_speed(&self, interval: u32) -> u32 {
        if self.day == 0 {
            0
        } else {
            (self.day - 1) / interval.max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_cycle_in_both_directions() {
        assert_eq!(DayPhase::Evening.next(), DayPhase::Night);
        assert_eq!(DayPhase::Night.previous(), DayPhase::Evening);
        for phase in DayPhase::ALL {
            assert_eq!(phase.next().previous(), phase);
        }
    }

    #[test]
    fn minute_of_day_maps_onto_schedule() {
        let schedule = PhaseSchedule::new();
        assert_eq!(DayPhase::from_minute_of_day(0, &schedule), DayPhase::Night);
        assert_eq!(DayPhase::from_minute_of_day(8 * 60 + 25, &schedule), DayPhase::Morning);
        assert_eq!(DayPhase::from_minute_of_day(12 * 60, &schedule), DayPhase::Day);
        assert_eq!(DayPhase::from_minute_of_day(19 * 60, &schedule), DayPhase::Vote);
        assert_eq!(DayPhase::from_minute_of_day(20 * 60 + 1, &schedule), DayPhase::Execution);
        assert_eq!(DayPhase::from_minute_of_day(23 * 60, &schedule), DayPhase::Evening);
    }

    #[test]
    fn entering_morning_increments_day() {
        let mut clock = Clock::new(0, DayPhase::Night);
        assert_eq!(clock.advance(), DayPhase::Morning);
        assert_eq!(clock.day, 1);
        clock.advance();
        assert_eq!(clock.day, 1);
    }

    #[test]
    fn game_speed_steps_every_interval() {
        assert_eq!(Clock::new(0, DayPhase::Day).game_speed(4), 0);
        assert_eq!(Clock::new(4, DayPhase::Day).game_speed(4), 0);
        assert_eq!(Clock::new(5, DayPhase::Day).game_speed(4), 1);
        assert_eq!(Clock::new(9, DayPhase::Day).game_speed(4), 2);
    }

    #[test]
    fn phase_names_parse_case_insensitively() {
        assert_eq!("evening".parse::<DayPhase>().ok(), Some(DayPhase::Evening));
        assert_eq!(DayPhase::Execution.to_string(), "EXECUTION");
    }
}
