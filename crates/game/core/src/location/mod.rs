//! Places players can visit.
//!
//! Visits are not stored on the location: each [`crate::state::Player`]
//! records where it currently is, and visitors are derived from that.

mod house;

pub use house::{House, HouseError, HouseMethod, HouseState, REBUILD_DAYS};

use crate::state::{LocationId, PlayerIdentifier};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationKind {
    /// A destructible home owned by one player.
    House {
        owner: PlayerIdentifier,
        house: House,
    },
    /// An unowned, named meeting point.
    Bridge { name: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub id: LocationId,
    pub kind: LocationKind,
}

impl Location {
    pub fn house(id: LocationId, owner: PlayerIdentifier) -> Self {
        Self {
            id,
            kind: LocationKind::House {
                owner,
                house: House::new(),
            },
        }
    }

    pub fn bridge(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: LocationKind::Bridge { name: name.into() },
        }
    }

    pub fn is_house(&self) -> bool {
        matches!(self.kind, LocationKind::House { .. })
    }

    pub fn is_bridge(&self) -> bool {
        matches!(self.kind, LocationKind::Bridge { .. })
    }

    pub fn owner(&self) -> Option<PlayerIdentifier> {
        match &self.kind {
            LocationKind::House { owner, .. } => Some(*owner),
            LocationKind::Bridge { .. } => None,
        }
    }

    pub fn as_house(&self) -> Option<&House> {
        match &self.kind {
            LocationKind::House { house, .. } => Some(house),
            LocationKind::Bridge { .. } => None,
        }
    }

    pub fn as_house_mut(&mut self) -> Option<&mut House> {
        match &mut self.kind {
            LocationKind::House { house, .. } => Some(house),
            LocationKind::Bridge { .. } => None,
        }
    }
}
