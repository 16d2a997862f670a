//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use blackjack::{GameSettings, MAX_PLAYERS};
use std::net::SocketAddr;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Game defaults applied to every table the server creates
    pub game: GameSettings,
    /// Number of rooms to create on startup
    pub num_rooms: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `num_rooms_override` - Optional number of rooms override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable parses but fails validation
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        num_rooms_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let bind = bind_override
            .or_else(|| {
                std::env::var("SERVER_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| {
                "127.0.0.1:3000"
                    .parse()
                    .expect("Default bind address is valid")
            });

        let defaults = GameSettings::default();
        let game = GameSettings {
            starting_chips: parse_env_or("TABLE_STARTING_CHIPS", defaults.starting_chips),
            min_players_to_bet: parse_env_or("TABLE_MIN_PLAYERS_TO_BET", defaults.min_players_to_bet),
            max_players: parse_env_or("TABLE_MAX_PLAYERS", defaults.max_players),
        };

        let num_rooms = num_rooms_override.unwrap_or_else(|| parse_env_or("NUM_ROOMS", 0));

        let config = ServerConfig {
            bind,
            game,
            num_rooms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.starting_chips == 0 {
            return Err(ConfigError::Invalid {
                var: "TABLE_STARTING_CHIPS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.game.max_players == 0 {
            return Err(ConfigError::Invalid {
                var: "TABLE_MAX_PLAYERS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.game.max_players > MAX_PLAYERS {
            return Err(ConfigError::Invalid {
                var: "TABLE_MAX_PLAYERS".to_string(),
                reason: format!("Must be at most {MAX_PLAYERS} (single 52-card deck)"),
            });
        }

        if self.game.min_players_to_bet == 0 {
            return Err(ConfigError::Invalid {
                var: "TABLE_MIN_PLAYERS_TO_BET".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
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

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            game: GameSettings::default(),
            num_rooms: 1,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "TABLE_STARTING_CHIPS".to_string(),
            reason: "Must be greater than 0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("TABLE_STARTING_CHIPS"));
        assert!(msg.contains("greater than 0"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_starting_chips() {
        let mut config = base_config();
        config.game.starting_chips = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_config_validation_too_many_players() {
        let mut config = base_config();
        config.game.max_players = MAX_PLAYERS + 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
