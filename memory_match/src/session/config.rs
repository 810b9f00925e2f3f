//! Session configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::{
    constants::{LOSS_ANNOUNCE_DELAY, MATCH_REVEAL_DELAY, MISMATCH_REVEAL_DELAY, WIN_ANNOUNCE_DELAY},
    entities::{Outcome, PairOutcome},
};

/// Pacing presets. Speed only scales how long things stay on screen; the
/// rules of a round are the same at every speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameSpeed {
    #[default]
    Normal,
    Fast,
    Instant,
}

impl GameSpeed {
    fn scale(self, delay: Duration) -> Duration {
        match self {
            GameSpeed::Normal => delay,
            GameSpeed::Fast => delay / 4,
            GameSpeed::Instant => Duration::ZERO,
        }
    }
}

impl std::fmt::Display for GameSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameSpeed::Normal => write!(f, "normal"),
            GameSpeed::Fast => write!(f, "fast"),
            GameSpeed::Instant => write!(f, "instant"),
        }
    }
}

impl std::str::FromStr for GameSpeed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(GameSpeed::Normal),
            "fast" => Ok(GameSpeed::Fast),
            "instant" => Ok(GameSpeed::Instant),
            other => Err(ConfigError::UnknownSpeed(other.to_string())),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session name, used in log lines
    pub name: String,

    /// Reveal and announce pacing
    pub speed: GameSpeed,

    /// Fixed shuffle seed. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Capacity of each subscriber channel
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "Memory Match".to_string(),
            speed: GameSpeed::Normal,
            seed: None,
            event_buffer: 64,
        }
    }
}

impl SessionConfig {
    /// Load configuration from `MM_*` environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns error if `MM_SPEED` names an unknown preset
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let speed = match std::env::var("MM_SPEED") {
            Ok(value) => value.parse().map_err(|e: ConfigError| ConfigError::Invalid {
                var: "MM_SPEED".to_string(),
                reason: e.to_string(),
            })?,
            Err(_) => defaults.speed,
        };

        Ok(Self {
            name: std::env::var("MM_SESSION_NAME").unwrap_or(defaults.name),
            speed,
            seed: std::env::var("MM_SEED").ok().and_then(|v| v.parse().ok()),
            event_buffer: parse_env_or("MM_EVENT_BUFFER", defaults.event_buffer),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "MM_SESSION_NAME".to_string(),
                reason: "Must not be blank".to_string(),
            });
        }

        if self.event_buffer == 0 {
            return Err(ConfigError::Invalid {
                var: "MM_EVENT_BUFFER".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// How long a pair stays face-up before it is resolved
    pub fn reveal_delay(&self, outcome: PairOutcome) -> Duration {
        self.speed.scale(match outcome {
            PairOutcome::Match => MATCH_REVEAL_DELAY,
            PairOutcome::Mismatch => MISMATCH_REVEAL_DELAY,
        })
    }

    /// How long the end of a round waits before it is announced
    pub fn announce_delay(&self, outcome: Outcome) -> Duration {
        self.speed.scale(match outcome {
            Outcome::Won => WIN_ANNOUNCE_DELAY,
            Outcome::Lost => LOSS_ANNOUNCE_DELAY,
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Unknown speed '{0}' (expected normal, fast or instant)")]
    UnknownSpeed(String),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
