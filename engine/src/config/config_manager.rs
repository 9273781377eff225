use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::{ConfigError, ConfigSource, FileConfigSource, Validate, from_yaml, to_yaml};

/// Lazily loads a YAML config from its source, validating it and caching the
/// result. A source with no stored content yields `TConfig::default()`.
pub struct ConfigManager<TSource, TConfig>
where
    TSource: ConfigSource,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    source: TSource,
    cached: Mutex<Option<TConfig>>,
}

impl<TConfig> ConfigManager<FileConfigSource, TConfig>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Self {
        Self::new(FileConfigSource::new(path.as_ref()))
    }
}

impl<TSource, TConfig> ConfigManager<TSource, TConfig>
where
    TSource: ConfigSource,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn new(source: TSource) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    pub fn get_config(&self) -> Result<TConfig, ConfigError> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(config) = cached.as_ref() {
            return Ok(config.clone());
        }

        let Some(content) = self.source.load()? else {
            return Ok(TConfig::default());
        };

        let config: TConfig = from_yaml(&content)?;
        config.validate().map_err(ConfigError::Invalid)?;

        *cached = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;

        let content = to_yaml(config)?;
        self.source.store(&content)?;

        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        *cached = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, InMemoryConfigSource};
    use crate::logger::LogLevel;

    #[test]
    fn test_empty_source_yields_default_config() {
        let manager: ConfigManager<_, GameConfig> = ConfigManager::new(InMemoryConfigSource::new());
        assert_eq!(manager.get_config().unwrap(), GameConfig::default());
    }

    #[test]
    fn test_stored_config_is_read_back() {
        let manager = ConfigManager::new(InMemoryConfigSource::new());
        let config = GameConfig {
            ai_move_delay_ms: 0,
            log_level: LogLevel::Debug,
            log_prefix: Some("Test".to_string()),
        };
        manager.set_config(&config).unwrap();

        let reloaded: ConfigManager<_, GameConfig> = ConfigManager::new(InMemoryConfigSource::with_content(
            &to_yaml(&config).unwrap(),
        ));
        assert_eq!(reloaded.get_config().unwrap(), config);
        assert_eq!(manager.get_config().unwrap(), config);
    }

    #[test]
    fn test_invalid_content_is_rejected_on_load() {
        let manager: ConfigManager<_, GameConfig> =
            ConfigManager::new(InMemoryConfigSource::with_content("ai_move_delay_ms: 999999\n"));
        match manager.get_config() {
            Err(ConfigError::Invalid(reason)) => assert!(reason.contains("ai_move_delay_ms")),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_config_is_not_stored() {
        let source = InMemoryConfigSource::new();
        let manager = ConfigManager::new(source);
        let config = GameConfig {
            ai_move_delay_ms: 60_000,
            ..GameConfig::default()
        };
        assert!(manager.set_config(&config).is_err());
        assert_eq!(manager.get_config().unwrap(), GameConfig::default());
    }

    #[test]
    fn test_malformed_yaml_reports_deserialize_error() {
        let manager: ConfigManager<_, GameConfig> =
            ConfigManager::new(InMemoryConfigSource::with_content("ai_move_delay_ms: [nope"));
        assert!(matches!(manager.get_config(), Err(ConfigError::Deserialize(_))));
    }
}
