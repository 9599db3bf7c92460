//! Configuration for the screensaver runner: a JSON file with serde
//! defaults, a validation pass, and the interactive entity-count prompt.

use serde::Deserialize;
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

pub mod prompt;

pub use prompt::{prompt_entity_count, PromptError};

/// Valid range for the entity count, whether it arrives from the CLI, the
/// config file or the interactive prompt.
pub const MIN_ENTITIES: usize = 1;
pub const MAX_ENTITIES: usize = 100;

// --- Error type ---

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

// --- Enums for choices ---

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
}

// --- Configuration sections ---

#[derive(Deserialize, Debug, Clone)]
pub struct WorldSettings {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    700.0
}
fn default_height() -> f32 {
    700.0
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            width: default_width(),
            height: default_height(),
        }
    }
}

// --- Top-level config struct ---

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Target frames per second for the pacer.
    #[serde(default = "default_framerate")]
    pub framerate: u32,
    #[serde(default)]
    pub world: WorldSettings,
    /// Number of entities, within [`MIN_ENTITIES`, `MAX_ENTITIES`].
    #[serde(default = "default_entities")]
    pub entities: usize,
    /// Worker thread count for the parallel stepper.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Symmetric velocity clamp: components stay within [-limit, limit].
    #[serde(default = "default_speed_limit")]
    pub speed_limit: f32,
    #[serde(default)]
    pub shape: ShapeKind,
    /// Seed for entity spawning; a random seed is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_framerate() -> u32 {
    60
}
fn default_entities() -> usize {
    50
}
fn default_workers() -> usize {
    6
}
fn default_speed_limit() -> f32 {
    5.0
}

impl Default for Config {
    fn default() -> Self {
        Config {
            framerate: default_framerate(),
            world: WorldSettings::default(),
            entities: default_entities(),
            workers: default_workers(),
            speed_limit: default_speed_limit(),
            shape: ShapeKind::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.framerate == 0 {
            return Err(ConfigError::Validation(
                "framerate cannot be zero".to_string(),
            ));
        }
        if self.entities < MIN_ENTITIES || self.entities > MAX_ENTITIES {
            return Err(ConfigError::Validation(format!(
                "entity count must be between {MIN_ENTITIES} and {MAX_ENTITIES}, got {}",
                self.entities
            )));
        }
        if self.workers == 0 {
            return Err(ConfigError::Validation(
                "worker count must be at least 1".to_string(),
            ));
        }
        // The spawn inset (30 units per side) and the largest entity extent
        // must both fit inside the viewport.
        if self.world.width < 100.0 || self.world.height < 100.0 {
            return Err(ConfigError::Validation(format!(
                "world must be at least 100x100 units, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.speed_limit <= 0.0 {
            return Err(ConfigError::Validation(
                "speed limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// --- Loading function ---

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
