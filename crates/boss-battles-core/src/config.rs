//! Encounter configuration.
//!
//! [`EncounterConfig`] holds every tunable of an encounter. It can be built
//! in code from [`Default`] plus builder methods, or loaded from a JSON file
//! where every field is optional:
//!
//! ```json
//! {
//!   "turn_time_secs": 15,
//!   "token_length": 5,
//!   "seed": 42,
//!   "bosses": ["squirrel", "squirrel", "giant_wolf_spider"],
//!   "player_class": "fighter",
//!   "message_history": 20
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::character::{BossKind, CharacterClass};
use crate::token::DEFAULT_TOKEN_LENGTH;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Seconds players get each round before the bosses act.
    pub turn_time_secs: u64,
    /// Length of opportunity tokens.
    pub token_length: usize,
    /// Seed for dice, tokens and boss decisions. Random when absent.
    pub seed: Option<u64>,
    /// Bosses in registration order.
    pub bosses: Vec<BossKind>,
    /// Class given to every registered player.
    pub player_class: CharacterClass,
    /// How many messages of each kind the display keeps.
    pub message_history: usize,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            turn_time_secs: 10,
            token_length: DEFAULT_TOKEN_LENGTH,
            seed: None,
            bosses: vec![BossKind::Squirrel],
            player_class: CharacterClass::Fighter,
            message_history: 20,
        }
    }
}

impl EncounterConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`EncounterConfig::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the token length is zero or there
    /// are no bosses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_length == 0 {
            return Err(ConfigError::Invalid("token_length must be at least 1".into()));
        }
        if self.bosses.is_empty() {
            return Err(ConfigError::Invalid("at least one boss is required".into()));
        }
        Ok(())
    }

    /// Player turn budget.
    #[must_use]
    pub const fn turn_time(&self) -> Duration {
        Duration::from_secs(self.turn_time_secs)
    }

    /// Sets the player turn budget in seconds.
    #[must_use]
    pub fn with_turn_time_secs(mut self, secs: u64) -> Self {
        self.turn_time_secs = secs;
        self
    }

    /// Sets the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the boss list.
    #[must_use]
    pub fn with_bosses(mut self, bosses: Vec<BossKind>) -> Self {
        self.bosses = bosses;
        self
    }

    /// Sets the token length.
    #[must_use]
    pub fn with_token_length(mut self, length: usize) -> Self {
        self.token_length = length;
        self
    }
}
