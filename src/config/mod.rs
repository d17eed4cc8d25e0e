//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::game::tuning::SPRITE_SHEETS;
use crate::util::time::FRAME_DURATION_MILLIS;

/// Runtime configuration loaded from environment variables.
///
/// Gameplay constants are not here; see `game::tuning`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Owner name of the local player, used as the `sender` of every intent
    pub player_name: String,
    /// Sprite sheet index of the local player
    pub player_index: usize,
    /// Spawn assignment for the local player
    pub spawn_x: f32,
    pub spawn_y: f32,

    /// Frame pacing period while the local player is moving
    pub frame_interval: Duration,

    /// Seed for the demo input bot
    pub bot_seed: u64,
    /// How long the demo session runs
    pub run_for: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let frame_interval_ms: u64 = parse_or("FRAME_INTERVAL_MS", FRAME_DURATION_MILLIS)?;
        if frame_interval_ms == 0 {
            return Err(ConfigError::Invalid("FRAME_INTERVAL_MS"));
        }

        let player_name = env::var("PLAYER_NAME").unwrap_or_else(|_| "player1".to_string());
        if player_name.trim().is_empty() {
            return Err(ConfigError::Invalid("PLAYER_NAME"));
        }

        let player_index = parse_sheet_index("PLAYER_INDEX", 0)?;

        let spawn_x = parse_finite("SPAWN_X", 32.0)?;
        let spawn_y = parse_finite("SPAWN_Y", 32.0)?;

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            player_name,
            player_index,
            spawn_x,
            spawn_y,

            frame_interval: Duration::from_millis(frame_interval_ms),

            bot_seed: parse_or("BOT_SEED", 7)?,
            run_for: Duration::from_secs(parse_or("RUN_SECS", 10)?),
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

fn parse_sheet_index(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    let index: usize = parse_or(key, default)?;
    if index >= SPRITE_SHEETS {
        return Err(ConfigError::Invalid(key));
    }
    Ok(index)
}

/// Coordinates must be finite: a NaN spawn never compares equal to itself.
fn parse_finite(key: &'static str, default: f32) -> Result<f32, ConfigError> {
    let value: f32 = parse_or(key, default)?;
    if !value.is_finite() {
        return Err(ConfigError::Invalid(key));
    }
    Ok(value)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_when_unset() {
        let value: u64 = parse_or("ARENA_CLIENT_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn sheet_index_must_name_an_existing_sheet() {
        env::set_var("ARENA_CLIENT_TEST_SHEET_OK", "3");
        env::set_var("ARENA_CLIENT_TEST_SHEET_BAD", "4");

        assert_eq!(parse_sheet_index("ARENA_CLIENT_TEST_SHEET_OK", 0).unwrap(), 3);
        assert!(matches!(
            parse_sheet_index("ARENA_CLIENT_TEST_SHEET_BAD", 0),
            Err(ConfigError::Invalid("ARENA_CLIENT_TEST_SHEET_BAD"))
        ));
    }

    #[test]
    fn parse_finite_rejects_nan_and_infinity() {
        env::set_var("ARENA_CLIENT_TEST_NAN_VAR", "NaN");
        env::set_var("ARENA_CLIENT_TEST_INF_VAR", "inf");
        env::set_var("ARENA_CLIENT_TEST_COORD_VAR", "64.5");

        assert!(matches!(
            parse_finite("ARENA_CLIENT_TEST_NAN_VAR", 0.0),
            Err(ConfigError::Invalid("ARENA_CLIENT_TEST_NAN_VAR"))
        ));
        assert!(matches!(
            parse_finite("ARENA_CLIENT_TEST_INF_VAR", 0.0),
            Err(ConfigError::Invalid("ARENA_CLIENT_TEST_INF_VAR"))
        ));
        assert_eq!(parse_finite("ARENA_CLIENT_TEST_COORD_VAR", 0.0).unwrap(), 64.5);
    }

    #[test]
    fn parse_or_rejects_garbage() {
        env::set_var("ARENA_CLIENT_TEST_BAD_VAR", "not-a-number");
        let result: Result<u64, _> = parse_or("ARENA_CLIENT_TEST_BAD_VAR", 1);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid("ARENA_CLIENT_TEST_BAD_VAR"))
        ));
    }
}
