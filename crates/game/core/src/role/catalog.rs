//! Static role registry.
//!
//! Every role and job is a plain enum variant. Character type, faction group,
//! granted abilities and starting items are looked up from match tables, and
//! the stable snake_case name (via strum) is how roles are persisted and
//! reconstructed.

use crate::action::Action;
use crate::role::Item;

/// What investigative abilities reveal about a player.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CharacterType {
    Shady,
    NotShady,
    Vague,
    Undefined,
}

/// Win-condition-sharing faction.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Group {
    Werewolves,
    Townspeople,
    Cult,
    Lovers,
    Hitman,
    Arsonist,
    Jester,
    /// Members never win on their own; ignored by every win check.
    Nonwinning,
}

/// Role assigned once at game start.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MainRole {
    Werewolf,
    WerewolfElder,
    WerewolfCleaner,
    WerewolfFramer,
    Archer,
    Arsonist,
    Executioner,
    Hitman,
    Poisoner,
    Stalker,
    Clairvoyant,
    GuardianAngel,
    Healer,
    Judge,
    Matchmaker,
    Medium,
    Muter,
    PrivateInvestigator,
    Sceptic,
    Scrutinizer,
    Scout,
    Sommelier,
    Townsperson,
    CultLeader,
    Graverobber,
}

impl MainRole {
    pub const fn character(self) -> CharacterType {
        use CharacterType::*;
        use MainRole::*;

        match self {
            Werewolf | WerewolfElder | WerewolfCleaner => Shady,
            Archer | Arsonist | Executioner | Hitman | Poisoner | Stalker => Shady,
            CultLeader | Graverobber => Vague,
            WerewolfFramer | Clairvoyant | GuardianAngel | Healer | Judge | Matchmaker | Medium
            | Muter | PrivateInvestigator | Sceptic | Scrutinizer | Scout | Sommelier
            | Townsperson => NotShady,
        }
    }

    pub const fn group(self) -> Group {
        use MainRole::*;

        match self {
            Werewolf | WerewolfElder | WerewolfCleaner | WerewolfFramer => Group::Werewolves,
            Arsonist => Group::Arsonist,
            Hitman => Group::Hitman,
            CultLeader => Group::Cult,
            Graverobber => Group::Nonwinning,
            Archer | Executioner | Poisoner | Stalker | Clairvoyant | GuardianAngel | Healer
            | Judge | Matchmaker | Medium | Muter | PrivateInvestigator | Sceptic | Scrutinizer
            | Scout | Sommelier | Townsperson => Group::Townspeople,
        }
    }

    pub const fn actions(self) -> &'static [Action] {
        match self {
            MainRole::Archer => &[Action::Shoot],
            MainRole::Arsonist => &[Action::Soak, Action::Burn],
            MainRole::Clairvoyant => &[Action::ClairvoyantSeeRole],
            MainRole::Graverobber => &[Action::RobGrave],
            MainRole::GuardianAngel => &[Action::Protect],
            MainRole::Healer => &[Action::Heal],
            MainRole::Medium => &[Action::Revive],
            MainRole::Poisoner => &[Action::Poison],
            MainRole::PrivateInvestigator => &[Action::PrivateInvestigate],
            _ => &[],
        }
    }

    /// Items granted when the role is first assigned.
    pub const fn initial_items(self) -> &'static [(Item, u32)] {
        match self {
            MainRole::Graverobber => &[(Item::Grave, 1)],
            MainRole::Healer => &[(Item::Medkit, 1)],
            MainRole::Medium => &[(Item::Revive, 1)],
            MainRole::Poisoner => &[(Item::Poison, 1)],
            _ => &[],
        }
    }

    pub const fn is_werewolf(self) -> bool {
        matches!(self.group(), Group::Werewolves)
    }
}

/// Secondary role layered on top of the main role during play.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DoubleRole {
    Follower,
    Jester,
    Lover,
    WolfCub,
}

impl DoubleRole {
    pub const fn character(self) -> CharacterType {
        match self {
            DoubleRole::Follower | DoubleRole::Jester | DoubleRole::WolfCub => {
                CharacterType::Vague
            }
            DoubleRole::Lover => CharacterType::Undefined,
        }
    }

    pub const fn group(self) -> Group {
        match self {
            DoubleRole::Follower => Group::Cult,
            DoubleRole::Jester => Group::Jester,
            DoubleRole::Lover => Group::Lovers,
            DoubleRole::WolfCub => Group::Nonwinning,
        }
    }
}

/// Office held by a player; jobs carry no faction.
///
/// Variants are declared in investigative precedence order: when a player
/// holds several jobs, the earliest one determines their character.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Job {
    Mayor,
    AlphaWolf,
    Blacksmith,
    Gatekeeper,
}

impl Job {
    pub const fn character(self) -> CharacterType {
        match self {
            Job::Mayor => CharacterType::NotShady,
            Job::AlphaWolf | Job::Blacksmith => CharacterType::Shady,
            Job::Gatekeeper => CharacterType::Undefined,
        }
    }

    pub const fn actions(self) -> &'static [Action] {
        match self {
            Job::Mayor => &[Action::MayorDecide, Action::SuccessorMayor],
            Job::AlphaWolf => &[Action::AlphaWolfKill, Action::SuccessorAlphaWolf],
            Job::Blacksmith => &[Action::Clean],
            Job::Gatekeeper => &[],
        }
    }

    pub const fn initial_items(self) -> &'static [(Item, u32)] {
        match self {
            Job::AlphaWolf => &[(Item::Kill, 1)],
            _ => &[],
        }
    }

    /// Successor designation that inherits this job, if any.
    pub const fn succession_action(self) -> Option<Action> {
        match self {
            Job::Mayor => Some(Action::SuccessorMayor),
            Job::AlphaWolf => Some(Action::SuccessorAlphaWolf),
            _ => None,
        }
    }
}
