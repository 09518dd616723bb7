use bitflags::bitflags;

use crate::note::Deathnote;
use crate::role::{CharacterType, DoubleRole, Group, ItemCounters, Job, MainRole, Purpose};
use crate::state::{LocationId, PlayerIdentifier, StateError};

bitflags! {
    /// Status flags of one player.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PlayerFlags: u8 {
        const ALIVE     = 1 << 0;
        /// Immune to kills until the next DAY.
        const PROTECTED = 1 << 1;
        /// Left out of the public LYNCH and MAYOR votes.
        const MUTED     = 1 << 2;
        /// Scheduled to die at the next kill step.
        const MARKED    = 1 << 3;
    }
}

/// Aggregate root for one participant of an instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerIdentifier,
    /// Assigned at game start.
    pub main_role: Option<MainRole>,
    double_roles: Vec<DoubleRole>,
    jobs: Vec<Job>,
    pub house: Option<LocationId>,
    /// Location the player is currently visiting.
    pub location: Option<LocationId>,
    pub deathnote: Deathnote,
    pub flags: PlayerFlags,
    pub items: ItemCounters,
}

impl Player {
    pub fn new(id: PlayerIdentifier) -> Self {
        Self {
            id,
            main_role: None,
            double_roles: Vec::new(),
            jobs: Vec::new(),
            house: None,
            location: None,
            deathnote: Deathnote::new(),
            flags: PlayerFlags::ALIVE,
            items: ItemCounters::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.flags.contains(PlayerFlags::ALIVE)
    }

    pub fn is_protected(&self) -> bool {
        self.flags.contains(PlayerFlags::PROTECTED)
    }

    pub fn is_muted(&self) -> bool {
        self.flags.contains(PlayerFlags::MUTED)
    }

    pub fn is_marked(&self) -> bool {
        self.flags.contains(PlayerFlags::MARKED)
    }

    pub fn is_werewolf(&self) -> bool {
        self.main_role.is_some_and(MainRole::is_werewolf)
    }

    pub fn double_roles(&self) -> &[DoubleRole] {
        &self.double_roles
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn has_job(&self, job: Job) -> bool {
        self.jobs.contains(&job)
    }

    pub fn add_double_role(&mut self, role: DoubleRole) -> Result<(), StateError> {
        if self.double_roles.contains(&role) {
            return Err(StateError::DuplicatePurpose {
                player: self.id,
                purpose: Purpose::Double(role),
            });
        }
        self.double_roles.push(role);
        Ok(())
    }

    pub fn remove_double_role(&mut self, role: DoubleRole) -> bool {
        let before = self.double_roles.len();
        self.double_roles.retain(|held| *held != role);
        before != self.double_roles.len()
    }

    /// Adds a job and grants its starting items.
    pub fn add_job(&mut self, job: Job) -> Result<(), StateError> {
        if self.has_job(job) {
            return Err(StateError::DuplicatePurpose {
                player: self.id,
                purpose: Purpose::Job(job),
            });
        }
        self.jobs.push(job);
        self.grant_initial_items(Purpose::Job(job));
        Ok(())
    }

    pub fn remove_job(&mut self, job: Job) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|held| *held != job);
        before != self.jobs.len()
    }

    /// Replaces the main role and grants the new role's starting items.
    pub fn assign_main_role(&mut self, role: MainRole) {
        self.main_role = Some(role);
        self.grant_initial_items(Purpose::Main(role));
    }

    fn grant_initial_items(&mut self, purpose: Purpose) {
        for (item, amount) in purpose.initial_items() {
            self.items.add(*item, *amount);
        }
    }

    /// Purposes in dispatch order: main role, double roles, then jobs.
    pub fn purposes(&self) -> impl Iterator<Item = Purpose> + '_ {
        self.main_role
            .map(Purpose::Main)
            .into_iter()
            .chain(self.double_roles.iter().copied().map(Purpose::Double))
            .chain(self.jobs.iter().copied().map(Purpose::Job))
    }

    /// Factions this player counts towards, excluding NONWINNING.
    pub fn groups(&self) -> Vec<Group> {
        self.main_role
            .map(MainRole::group)
            .into_iter()
            .chain(self.double_roles.iter().map(|role| role.group()))
            .filter(|group| *group != Group::Nonwinning)
            .collect()
    }

    /// Character revealed to investigators.
    ///
    /// The highest-precedence job wins; otherwise a single double role shows
    /// its own character and several read as SHADY; otherwise the main role
    /// decides.
    pub fn character(&self) -> CharacterType {
        if let Some(job) = self.jobs.iter().min() {
            return job.character();
        }
        match self.double_roles.as_slice() {
            [] => self
                .main_role
                .map_or(CharacterType::Undefined, MainRole::character),
            [single] => single.character(),
            _ => CharacterType::Shady,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Item;
    use crate::state::{InstanceId, UserId};

    fn create_test_player(role: MainRole) -> Player {
        let mut player = Player::new(PlayerIdentifier::new(InstanceId(1), UserId(1)));
        player.assign_main_role(role);
        player
    }

    #[test]
    fn jobs_take_precedence_for_character() {
        let mut player = create_test_player(MainRole::Werewolf);
        assert_eq!(player.character(), CharacterType::Shady);

        player.add_job(Job::Gatekeeper).unwrap();
        player.add_job(Job::Mayor).unwrap();
        assert_eq!(player.character(), CharacterType::NotShady);
    }

    #[test]
    fn several_double_roles_read_as_shady() {
        let mut player = create_test_player(MainRole::Healer);
        player.add_double_role(DoubleRole::Lover).unwrap();
        assert_eq!(player.character(), CharacterType::Undefined);

        player.add_double_role(DoubleRole::Follower).unwrap();
        assert_eq!(player.character(), CharacterType::Shady);
    }

    #[test]
    fn duplicate_purposes_are_rejected() {
        let mut player = create_test_player(MainRole::Healer);
        player.add_job(Job::AlphaWolf).unwrap();
        assert!(matches!(
            player.add_job(Job::AlphaWolf),
            Err(StateError::DuplicatePurpose { .. })
        ));
        assert_eq!(player.items.get(Item::Kill), 1);
    }

    #[test]
    fn groups_skip_nonwinning() {
        let mut player = create_test_player(MainRole::Graverobber);
        player.add_double_role(DoubleRole::Lover).unwrap();
        assert_eq!(player.groups(), vec![Group::Lovers]);
    }

    #[test]
    fn purposes_are_listed_in_dispatch_order() {
        let mut player = create_test_player(MainRole::Archer);
        player.add_job(Job::Mayor).unwrap();
        player.add_double_role(DoubleRole::Jester).unwrap();

        let purposes: Vec<_> = player.purposes().collect();
        assert_eq!(
            purposes,
            vec![
                Purpose::Main(MainRole::Archer),
                Purpose::Double(DoubleRole::Jester),
                Purpose::Job(Job::Mayor)
            ]
        );
    }
}
