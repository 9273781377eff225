mod config_manager;
mod config_source;
mod error;
mod game_config;
mod yaml;

pub use config_manager::ConfigManager;
pub use config_source::{ConfigSource, FileConfigSource, InMemoryConfigSource};
pub use error::ConfigError;
pub use game_config::{GameConfig, MAX_AI_MOVE_DELAY_MS};
pub use yaml::{from_yaml, to_yaml};

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
