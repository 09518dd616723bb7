//! Queued action records and their payloads.

use chrono::{DateTime, Utc};

use crate::action::Effect;
use crate::state::{ActionId, InstanceId, LocationId, PlayerIdentifier};

/// Targets supplied with an ability invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionArgs {
    pub locations: Vec<LocationId>,
    pub players: Vec<PlayerIdentifier>,
}

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(players: impl IntoIterator<Item = PlayerIdentifier>) -> Self {
        Self {
            locations: Vec::new(),
            players: players.into_iter().collect(),
        }
    }

    pub fn locations(locations: impl IntoIterator<Item = LocationId>) -> Self {
        Self {
            locations: locations.into_iter().collect(),
            players: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_player(mut self, player: PlayerIdentifier) -> Self {
        self.players.push(player);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: LocationId) -> Self {
        self.locations.push(location);
        self
    }
}

/// Who acted, and with which targets.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreActionData {
    pub actor: PlayerIdentifier,
    pub args: ActionArgs,
}

impl PreActionData {
    pub fn new(actor: PlayerIdentifier, args: ActionArgs) -> Self {
        Self { actor, args }
    }
}

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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    #[default]
    NotExecuted,
    Executed,
    Complete,
}

/// When a planned effect should run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Stored in the pending queue and executed by the next drain.
    Queued,
    /// Executed as soon as it is accepted, then stored as already executed.
    Immediate,
}

/// Effect accepted by a purpose but not yet stored.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedAction {
    pub time: DateTime<Utc>,
    pub effect: Effect,
    pub payload: PreActionData,
    pub timing: Timing,
}

impl PlannedAction {
    pub fn queued(time: DateTime<Utc>, effect: Effect, payload: PreActionData) -> Self {
        Self {
            time,
            effect,
            payload,
            timing: Timing::Queued,
        }
    }

    pub fn immediate(time: DateTime<Utc>, effect: Effect, payload: PreActionData) -> Self {
        Self {
            time,
            effect,
            payload,
            timing: Timing::Immediate,
        }
    }

    /// Flattens the plan into leaf records.
    ///
    /// Composite effects expand depth-first into one record per leaf, each
    /// carrying the parent's time and payload. Ids are drawn from `next_id`
    /// in registration order, so a stable sort by time keeps children in
    /// order.
    pub fn into_records(
        self,
        instance: InstanceId,
        mut next_id: impl FnMut() -> ActionId,
    ) -> Vec<ActionRecord> {
        let status = match self.timing {
            Timing::Queued => ActionStatus::NotExecuted,
            Timing::Immediate => ActionStatus::Executed,
        };
        self.effect
            .into_leaves()
            .into_iter()
            .map(|effect| ActionRecord {
                id: next_id(),
                instance,
                time: self.time,
                effect,
                payload: self.payload.clone(),
                status,
            })
            .collect()
    }
}

/// Stored action of one instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRecord {
    pub id: ActionId,
    pub instance: InstanceId,
    pub time: DateTime<Utc>,
    pub effect: Effect,
    pub payload: PreActionData,
    pub status: ActionStatus,
}

impl ActionRecord {
    pub fn is_pending(&self) -> bool {
        self.status != ActionStatus::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UserId;

    #[test]
    fn composite_plans_flatten_into_ordered_leaves() {
        let actor = PlayerIdentifier::new(InstanceId(1), UserId(1));
        let payload = PreActionData::new(actor, ActionArgs::locations([LocationId(3)]));
        let plan = PlannedAction::queued(
            DateTime::<Utc>::UNIX_EPOCH,
            Effect::Composite(vec![Effect::MoveToLocation, Effect::KillPlayers]),
            payload.clone(),
        );

        let mut next = 10;
        let records = plan.into_records(InstanceId(1), || {
            next += 1;
            ActionId(next)
        });

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].effect, Effect::MoveToLocation);
        assert_eq!(records[1].effect, Effect::KillPlayers);
        assert_eq!(records[0].id, ActionId(11));
        assert_eq!(records[1].id, ActionId(12));
        assert!(records.iter().all(|record| record.payload == payload));
        assert!(records.iter().all(|r| r.status == ActionStatus::NotExecuted));
    }
}
