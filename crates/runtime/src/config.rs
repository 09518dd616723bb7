//! Runtime configuration and its environment loader.
use std::env;
use std::path::PathBuf;

use werewolf_core::GameConfig;

/// Configuration shared by the runtime, its workers and the logging setup.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub command_buffer_size: usize,
    /// Capacity of every event topic channel.
    pub event_buffer_size: usize,
    /// Default `tracing` directive; `RUST_LOG` takes precedence.
    pub log_filter: String,
    /// Write logs to a file in this directory as well.
    pub log_dir: Option<PathBuf>,
    /// Persist instance snapshots and action records in this directory.
    pub snapshot_dir: Option<PathBuf>,
    /// Seed of the role division.
    pub role_seed: u64,
    /// Minute of day the game opens at. `None` uses the wall clock.
    pub opening_minute: Option<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            command_buffer_size: 32,
            event_buffer_size: 100,
            log_filter: "info".to_owned(),
            log_dir: None,
            snapshot_dir: None,
            role_seed: 0,
            opening_minute: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `WEREWOLF_COMMAND_BUFFER` - Commands queued per instance worker (default: 32)
    /// - `WEREWOLF_EVENT_BUFFER` - Events buffered per topic (default: 100)
    /// - `WEREWOLF_LOG` - Default log directive (default: info)
    /// - `WEREWOLF_LOG_DIR` - Also log to `werewolf.log` in this directory
    /// - `WEREWOLF_LOG_TO_FILE` - Log to the platform cache directory when no dir is given
    /// - `WEREWOLF_SNAPSHOT_DIR` - Persist instances and queued actions in this directory
    /// - `WEREWOLF_ROLE_SEED` - Seed of the role division (default: 0)
    /// - `WEREWOLF_OPENING_MINUTE` - Minute of day the game opens at (default: wall clock)
    /// - `WEREWOLF_MIN_PLAYERS` / `WEREWOLF_MAX_PLAYERS` - Player bounds (default: 2 / 50)
    /// - `WEREWOLF_GAME_SPEED_INTERVAL` - Days per game speed step (default: 4)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("WEREWOLF_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("WEREWOLF_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        if let Ok(filter) = env::var("WEREWOLF_LOG") {
            config.log_filter = filter;
        }
        config.log_dir = env::var("WEREWOLF_LOG_DIR").ok().map(PathBuf::from);
        if config.log_dir.is_none() && read_env_bool("WEREWOLF_LOG_TO_FILE") == Some(true) {
            config.log_dir = Some(default_log_dir());
        }
        config.snapshot_dir = env::var("WEREWOLF_SNAPSHOT_DIR").ok().map(PathBuf::from);

        if let Some(seed) = read_env::<u64>("WEREWOLF_ROLE_SEED") {
            config.role_seed = seed;
        }
        config.opening_minute = read_env::<u32>("WEREWOLF_OPENING_MINUTE").map(|m| m % (24 * 60));

        let min_players = read_env::<usize>("WEREWOLF_MIN_PLAYERS");
        let max_players = read_env::<usize>("WEREWOLF_MAX_PLAYERS");
        if min_players.is_some() || max_players.is_some() {
            let min = min_players.unwrap_or(config.game.min_players);
            let max = max_players.unwrap_or(config.game.max_players).max(min);
            config.game = config.game.with_player_bounds(min, max);
        }
        if let Some(interval) = read_env::<u32>("WEREWOLF_GAME_SPEED_INTERVAL") {
            config.game = config.game.with_game_speed_interval(interval.max(1));
        }

        config
    }
}

/// Platform cache directory for log files.
///
/// - Linux: `~/.cache/werewolf/logs` (or `$XDG_CACHE_HOME/werewolf/logs`)
/// - macOS: `~/Library/Caches/werewolf/logs`
/// - Fallback: `/tmp/werewolf/logs`
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "werewolf")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/werewolf"))
        .join("logs")
}

/// Platform data directory for instance snapshots.
pub fn default_snapshot_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "werewolf")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("instances")
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_worker_buffers() {
        let config = RuntimeConfig::default();
        assert_eq!(config.command_buffer_size, 32);
        assert_eq!(config.event_buffer_size, 100);
        assert_eq!(config.log_filter, "info");
        assert!(config.snapshot_dir.is_none());
        assert_eq!(config.game.min_players, GameConfig::DEFAULT_MIN_PLAYERS);
    }

    #[test]
    fn default_dirs_are_namespaced() {
        assert!(default_log_dir().ends_with("logs"));
        assert!(default_snapshot_dir().ends_with("instances"));
    }
}
