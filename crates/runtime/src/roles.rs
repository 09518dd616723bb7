//! Role division for a starting game.
//!
//! The player count decides how many roles each category gets. Within a
//! category roles are drawn from a shuffled roster that is reshuffled once
//! exhausted, so every role of a category appears before any repeats. The
//! final pool is shuffled once more before it is handed to the players.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use werewolf_core::MainRole;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleCategory {
    Werewolves,
    Investigators,
    Protectors,
    Killers,
    Disruptors,
    Loners,
    Townsfolk,
}

impl RoleCategory {
    pub const fn roster(self) -> &'static [MainRole] {
        match self {
            RoleCategory::Werewolves => &[
                MainRole::Werewolf,
                MainRole::WerewolfFramer,
                MainRole::WerewolfCleaner,
                MainRole::WerewolfElder,
            ],
            RoleCategory::Investigators => &[
                MainRole::PrivateInvestigator,
                MainRole::Clairvoyant,
                MainRole::Scrutinizer,
            ],
            RoleCategory::Protectors => &[
                MainRole::GuardianAngel,
                MainRole::Healer,
                MainRole::Matchmaker,
                MainRole::Medium,
                MainRole::Stalker,
                MainRole::Scout,
            ],
            RoleCategory::Killers => &[
                MainRole::Executioner,
                MainRole::Archer,
                MainRole::Poisoner,
                MainRole::Judge,
            ],
            RoleCategory::Disruptors => &[MainRole::Muter, MainRole::Sommelier, MainRole::Sceptic],
            RoleCategory::Loners => &[
                MainRole::Graverobber,
                MainRole::Hitman,
                MainRole::Arsonist,
                MainRole::CultLeader,
            ],
            RoleCategory::Townsfolk => &[MainRole::Townsperson],
        }
    }
}

/// Number of roles per category for one player count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleDivision {
    counts: Vec<(RoleCategory, usize)>,
}

impl RoleDivision {
    pub fn for_players(players: usize) -> Self {
        let mut counts = vec![
            (RoleCategory::Werewolves, (players / 4).max(1).min(players)),
            (RoleCategory::Investigators, players / 6),
            (RoleCategory::Protectors, players / 5),
            (RoleCategory::Killers, players / 8),
            (RoleCategory::Disruptors, players / 10),
            (RoleCategory::Loners, usize::from(players >= 12)),
        ];
        let special: usize = counts.iter().map(|(_, count)| count).sum();
        counts.push((RoleCategory::Townsfolk, players.saturating_sub(special)));
        Self { counts }
    }

    pub fn count(&self, category: RoleCategory) -> usize {
        self.counts
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Draws the shuffled role pool. The same seed yields the same pool.
    pub fn draw(&self, seed: u64) -> Vec<MainRole> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pool = Vec::with_capacity(self.total());

        for (category, count) in &self.counts {
            let mut roster: Vec<MainRole> = Vec::new();
            for _ in 0..*count {
                if roster.is_empty() {
                    roster = category.roster().to_vec();
                    roster.shuffle(&mut rng);
                }
                if let Some(role) = roster.pop() {
                    pool.push(role);
                }
            }
        }

        pool.shuffle(&mut rng);
        pool
    }
}
