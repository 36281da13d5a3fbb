//! Session configuration loaded from JSON.

use super::constants::{DEFAULT_MAX_FLOOR, DEFAULT_MAX_TICK_SECONDS, FIRST_FLOOR};
use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every field is optional in the file and falls back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub player_name: String,
    /// Seed for both session RNGs. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Last floor of an advance run. Clearing it ends the game.
    pub max_floor: u32,
    /// Upper bound on the delta a single tick may consume
    pub max_tick_seconds: f64,
    pub starting_floor: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_name: "Sorcerer".to_string(),
            seed: None,
            max_floor: DEFAULT_MAX_FLOOR,
            max_tick_seconds: DEFAULT_MAX_TICK_SECONDS,
            starting_floor: FIRST_FLOOR,
        }
    }
}

impl SessionConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GameError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: SessionConfig = serde_json::from_str(&contents)
            .map_err(|e| GameError::Config(format!("failed to parse JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_floor < FIRST_FLOOR {
            return Err(GameError::Config("max_floor must be at least 1".to_string()));
        }
        if !(self.max_tick_seconds.is_finite() && self.max_tick_seconds > 0.0) {
            return Err(GameError::Config(format!(
                "max_tick_seconds must be positive, got {}",
                self.max_tick_seconds
            )));
        }
        if self.starting_floor < FIRST_FLOOR || self.starting_floor > self.max_floor {
            return Err(GameError::Config(format!(
                "starting_floor {} is outside 1..={}",
                self.starting_floor, self.max_floor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.max_floor, 10);
        assert_eq!(config.max_tick_seconds, 0.1);
        assert_eq!(config.starting_floor, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.player_name, "Sorcerer");
        assert_eq!(config.max_floor, 10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = SessionConfig {
            max_tick_seconds: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            starting_floor: 11,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            max_floor: 0,
            starting_floor: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, r#"{ "player_name": "Ilse", "max_floor": 3 }"#).unwrap();
        let config = SessionConfig::load_from_file(&path).unwrap();
        assert_eq!(config.player_name, "Ilse");
        assert_eq!(config.max_floor, 3);

        std::fs::write(&path, r#"{ "max_floor": 2, "starting_floor": 5 }"#).unwrap();
        assert!(matches!(
            SessionConfig::load_from_file(&path),
            Err(GameError::Config(_))
        ));
    }
}
