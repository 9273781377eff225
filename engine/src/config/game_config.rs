use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Validate;
use crate::logger::LogLevel;

pub const MAX_AI_MOVE_DELAY_MS: u64 = 10_000;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub ai_move_delay_ms: u64,
    pub log_level: LogLevel,
    pub log_prefix: Option<String>,
}

impl GameConfig {
    pub fn ai_move_delay(&self) -> Duration {
        Duration::from_millis(self.ai_move_delay_ms)
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.ai_move_delay_ms > MAX_AI_MOVE_DELAY_MS {
            return Err(format!(
                "ai_move_delay_ms must not exceed {} (got {})",
                MAX_AI_MOVE_DELAY_MS, self.ai_move_delay_ms
            ));
        }
        if let Some(ref prefix) = self.log_prefix
            && prefix.trim().is_empty()
        {
            return Err("log_prefix must not be blank".to_string());
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ai_move_delay_ms: 500,
            log_level: LogLevel::Info,
            log_prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::from_yaml;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert_eq!(GameConfig::default().ai_move_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: GameConfig = from_yaml("log_level: debug\n").unwrap();
        assert_eq!(config.ai_move_delay_ms, 500);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_prefix, None);
    }

    #[test]
    fn test_blank_prefix_is_invalid() {
        let config = GameConfig {
            log_prefix: Some("  ".to_string()),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_delay_limit_is_inclusive() {
        let config = GameConfig {
            ai_move_delay_ms: MAX_AI_MOVE_DELAY_MS,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
