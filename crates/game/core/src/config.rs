/// Minute-of-day boundaries at which each daytime phase ends.
///
/// A minute `m` belongs to the first phase whose end lies after it; minutes
/// past `end_of_execution` are EVENING.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseSchedule {
    pub end_of_night: u32,
    pub end_of_morning: u32,
    pub end_of_day: u32,
    pub end_of_vote: u32,
    pub end_of_execution: u32,
}

impl PhaseSchedule {
    pub const fn new() -> Self {
        Self {
            end_of_night: 8 * 60 + 25,
            end_of_morning: 8 * 60 + 30,
            end_of_day: 18 * 60,
            end_of_vote: 20 * 60,
            end_of_execution: 20 * 60 + 5,
        }
    }
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Days per game-speed step; game speed grows by one every interval.
    pub game_speed_interval: u32,

    /// Minimum players required to start a game.
    pub min_players: usize,

    /// Maximum players allowed in one game.
    pub max_players: usize,

    /// Lynch targets picked at game speed zero; each speed step adds one.
    pub lynch_base_count: u32,

    /// Delay before a poison takes effect, in minutes.
    pub poison_delay_minutes: i64,

    /// Gap between consecutive alpha-wolf kills in one night, in minutes.
    pub alpha_wolf_kill_stagger_minutes: i64,

    /// Names of the bridges created when a game starts.
    pub bridge_names: Vec<String>,

    /// Phase boundaries used to derive the starting phase from wall-clock time.
    pub schedule: PhaseSchedule,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const DEATHNOTE_MAX_LENGTH: usize = 1000;
    /// A PrivateInvestigator gets one investigation per this many players.
    pub const PLAYERS_PER_INVESTIGATION: usize = 10;
    /// Archers receive a fresh arrow on days divisible by this value.
    pub const ARCHER_ARROW_DAY_INTERVAL: u32 = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GAME_SPEED_INTERVAL: u32 = 4;
    pub const DEFAULT_MIN_PLAYERS: usize = 2;
    pub const DEFAULT_MAX_PLAYERS: usize = 50;
    pub const DEFAULT_LYNCH_BASE_COUNT: u32 = 1;
    pub const DEFAULT_POISON_DELAY_MINUTES: i64 = 12 * 60;
    pub const DEFAULT_ALPHA_WOLF_KILL_STAGGER_MINUTES: i64 = 5;

    pub fn new() -> Self {
        Self {
            game_speed_interval: Self::DEFAULT_GAME_SPEED_INTERVAL,
            min_players: Self::DEFAULT_MIN_PLAYERS,
            max_players: Self::DEFAULT_MAX_PLAYERS,
            lynch_base_count: Self::DEFAULT_LYNCH_BASE_COUNT,
            poison_delay_minutes: Self::DEFAULT_POISON_DELAY_MINUTES,
            alpha_wolf_kill_stagger_minutes: Self::DEFAULT_ALPHA_WOLF_KILL_STAGGER_MINUTES,
            bridge_names: vec![
                "Sint-vlaflip oversteekbrug voor wandelende teddyberen".to_owned(),
                "De heen en weerwolfbrug".to_owned(),
            ],
            schedule: PhaseSchedule::new(),
        }
    }

    #[must_use]
    pub fn with_player_bounds(mut self, min_players: usize, max_players: usize) -> Self {
        self.min_players = min_players;
        self.max_players = max_players;
        self
    }

    #[must_use]
    pub fn with_game_speed_interval(mut self, interval: u32) -> Self {
        self.game_speed_interval = interval.max(1);
        self
    }

    #[must_use]
    pub fn with_bridge_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bridge_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_schedule(mut self, schedule: PhaseSchedule) -> Self {
        self.schedule = schedule;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
