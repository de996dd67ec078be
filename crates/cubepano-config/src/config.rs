//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use cubepano_projection::OrientationConvention;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for render and sequence worker threads.
pub const MAX_THREADS: u32 = 64;

const CONFIG_FILE: &str = "config.ron";

/// Top-level converter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Equirectangular output settings.
    pub output: OutputConfig,
    /// Projection settings.
    pub projection: ProjectionConfig,
    /// Frame sequence settings.
    pub sequence: SequenceConfig,
    /// Skybox cross settings.
    pub cross: CrossConfig,
    /// Debug/logging settings.
    pub debug: DebugConfig,
}

/// Equirectangular output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Panorama width in pixels.
    pub width: u32,
    /// Panorama height in pixels.
    pub height: u32,
    /// Output path or sequence template. The extension picks the format.
    pub path: String,
}

/// Projection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Face axis and flip convention.
    pub convention: OrientationConvention,
    /// Worker threads (0 = one per CPU, otherwise 1-64).
    pub threads: u32,
}

/// Frame sequence configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SequenceConfig {
    /// Abort the sequence on the first failing frame.
    pub fail_fast: bool,
    /// Frames converted concurrently (0 = one per CPU).
    pub workers: u32,
}

/// Skybox cross configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrossConfig {
    /// Edge length of each face cell in pixels.
    pub face_size: u32,
    /// Output path.
    pub path: String,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level filter (e.g., "debug", "info", "cubepano_image=trace").
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 512,
            path: "out.png".to_string(),
        }
    }
}

impl Default for CrossConfig {
    fn default() -> Self {
        Self {
            face_size: 512,
            path: "skybox_cross.png".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Validate ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::debug!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(config_path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }

    /// Reject settings the converter cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.width == 0 || self.output.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "output resolution {}x{} must be positive",
                self.output.width, self.output.height
            )));
        }
        if self.projection.threads > MAX_THREADS {
            return Err(ConfigError::Invalid(format!(
                "too many threads specified ({}, range is 1-{MAX_THREADS})",
                self.projection.threads
            )));
        }
        if self.sequence.workers > MAX_THREADS {
            return Err(ConfigError::Invalid(format!(
                "too many sequence workers ({}, range is 1-{MAX_THREADS})",
                self.sequence.workers
            )));
        }
        if self.cross.face_size == 0 {
            return Err(ConfigError::Invalid(
                "skybox face size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
