//! Win detection.
//!
//! The chain is an ordered list of faction checks walked front to back; the
//! first faction that is the only one left alive wins.

use std::collections::BTreeSet;

use crate::error::{ErrorKind, ErrorSeverity, GameError};
use crate::role::Group;
use crate::state::InstanceState;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WinError {
    #[error("removing the links after {0} would cut off the rest of the win chain")]
    CutOffChain(Group),

    #[error("the win chain has no link at position {0}")]
    NoSuchLink(usize),
}

impl GameError for WinError {
    fn kind(&self) -> ErrorKind {
        match self {
            WinError::CutOffChain(_) => ErrorKind::Integrity,
            WinError::NoSuchLink(_) => ErrorKind::NotFound,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            WinError::CutOffChain(_) => "WIN_CUT_OFF_CHAIN",
            WinError::NoSuchLink(_) => "WIN_NO_SUCH_LINK",
        }
    }
}

/// Factions still in the game: every alive player's groups, NONWINNING excluded.
pub fn alive_groups(state: &InstanceState) -> BTreeSet<Group> {
    state
        .alive_players()
        .flat_map(|player| player.groups())
        .collect()
}

/// Condition of one link: the faction is the only one left alive.
fn wins(group: Group, alive: &BTreeSet<Group>) -> bool {
    group != Group::Nonwinning && alive.len() == 1 && alive.contains(&group)
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WinChain {
    links: Vec<Group>,
}

impl WinChain {
    pub fn new(links: impl IntoIterator<Item = Group>) -> Self {
        Self {
            links: links.into_iter().collect(),
        }
    }

    pub fn links(&self) -> &[Group] {
        &self.links
    }

    /// Replaces everything after position `at` with `tail`.
    ///
    /// An empty tail may only drop a single successor; dropping two or more
    /// links at once fails with [`WinError::CutOffChain`].
    pub fn set_next(&mut self, at: usize, tail: Vec<Group>) -> Result<(), WinError> {
        let Some(group) = self.links.get(at).copied() else {
            return Err(WinError::NoSuchLink(at));
        };
        if tail.is_empty() && self.links.len() - at > 2 {
            return Err(WinError::CutOffChain(group));
        }
        self.links.truncate(at + 1);
        self.links.extend(tail);
        Ok(())
    }

    /// First faction in chain order that has won, if any.
    pub fn check_win(&self, state: &InstanceState) -> Option<Group> {
        let alive = alive_groups(state);
        self.links.iter().copied().find(|group| wins(*group, &alive))
    }
}

impl Default for WinChain {
    fn default() -> Self {
        Self::new([
            Group::Arsonist,
            Group::Cult,
            Group::Hitman,
            Group::Lovers,
            Group::Townspeople,
            Group::Werewolves,
        ])
    }
}
