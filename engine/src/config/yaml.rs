use serde::{Deserialize, Serialize};

use super::ConfigError;

pub fn to_yaml<TConfig: Serialize>(config: &TConfig) -> Result<String, ConfigError> {
    serde_yaml_ng::to_string(config).map_err(ConfigError::Serialize)
}

pub fn from_yaml<TConfig>(content: &str) -> Result<TConfig, ConfigError>
where
    TConfig: for<'de> Deserialize<'de>,
{
    serde_yaml_ng::from_str(content).map_err(ConfigError::Deserialize)
}
