use crate::action::Action;
use crate::role::{CharacterType, DoubleRole, Group, Item, Job, MainRole};

/// Anything that grants abilities to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Purpose {
    Main(MainRole),
    Double(DoubleRole),
    Job(Job),
}

impl Purpose {
    pub const fn character(self) -> CharacterType {
        match self {
            Purpose::Main(role) => role.character(),
            Purpose::Double(role) => role.character(),
            Purpose::Job(job) => job.character(),
        }
    }

    /// Faction of the purpose; jobs have none.
    pub const fn group(self) -> Option<Group> {
        match self {
            Purpose::Main(role) => Some(role.group()),
            Purpose::Double(role) => Some(role.group()),
            Purpose::Job(_) => None,
        }
    }

    pub const fn actions(self) -> &'static [Action] {
        match self {
            Purpose::Main(role) => role.actions(),
            Purpose::Double(_) => &[],
            Purpose::Job(job) => job.actions(),
        }
    }

    pub fn grants(self, action: Action) -> bool {
        self.actions().contains(&action)
    }

    pub const fn initial_items(self) -> &'static [(Item, u32)] {
        match self {
            Purpose::Main(role) => role.initial_items(),
            Purpose::Double(_) => &[],
            Purpose::Job(job) => job.initial_items(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Purpose::Main(role) => role.into(),
            Purpose::Double(role) => role.into(),
            Purpose::Job(job) => job.into(),
        }
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
