//! Application configuration and game level settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{config::ConfigError, AppError};
use crate::game::reward::RewardTable;

/// Fixed window between accepted clicks within a session.
const CLICK_COOLDOWN: Duration = Duration::from_secs(3);

/// How long a mismatched pair stays visible before it is covered again.
const RESOLVE_DELAY: Duration = Duration::from_secs(5);

pub struct Config {
    pub discord_bot_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
        })
    }
}

/// Immutable configuration record for one difficulty level.
///
/// Passed to a session at construction; a running session never consults any
/// global settings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSettings {
    /// Level key as the player types it.
    pub level: String,
    /// Number of distinct cards on the board, each placed twice.
    pub pair_count: u32,
    /// Board positions displayed per row.
    pub per_row: usize,
    /// Wall-clock cooldown before the player may start another game.
    pub game_cooldown: Duration,
    /// Session lifetime; the game is force-ended once this elapses.
    pub timeout: Duration,
    /// Fixed window between accepted clicks.
    pub click_cooldown: Duration,
    /// How long a mismatched pair stays visible.
    pub resolve_delay: Duration,
    /// Reward table applied when the game ends.
    pub rewards: RewardTable,
}

impl LevelSettings {
    /// Looks up the built-in settings record for a level key.
    pub fn for_level(level: &str) -> Option<Self> {
        let (pair_count, per_row, game_cooldown, timeout) = match level {
            "1" => (3, 3, 600, 200),
            "2" => (4, 4, 900, 300),
            _ => return None,
        };

        Some(Self {
            level: level.to_string(),
            pair_count,
            per_row,
            game_cooldown: Duration::from_secs(game_cooldown),
            timeout: Duration::from_secs(timeout),
            click_cooldown: CLICK_COOLDOWN,
            resolve_delay: RESOLVE_DELAY,
            rewards: RewardTable::default(),
        })
    }

    /// All level keys the service accepts, for error messages.
    pub fn known_levels() -> &'static [&'static str] {
        &["1", "2"]
    }

    /// Total board positions for this level.
    pub fn board_size(&self) -> usize {
        self.pair_count as usize * 2
    }

    /// Attempt budget for this level.
    pub fn max_clicks(&self) -> u32 {
        self.pair_count * 2 + 2
    }
}
