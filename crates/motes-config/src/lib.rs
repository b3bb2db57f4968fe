//! Configuration file handling for motes.
//!
//! Settings live in `config.toml` inside the platform config directory
//! (for example `~/.config/motes/` on Linux). A missing file is not an
//! error: every field has a default.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use motes_core::{AnimationKind, ColorParseError, ColorTheme, ParticleCounts, Rgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.toml";

/// Errors from loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available on this platform")]
    NoConfigDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Color(#[from] ColorParseError),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// User configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Animation shown at startup; a random one when unset.
    pub animation: Option<AnimationKind>,
    /// Particle colour.
    pub color: ColorTheme,
    /// Backdrop colour as `#rrggbb`; black when unset.
    pub background: Option<String>,
    /// Simulation frame rate.
    pub fps: u32,
    /// Particle size relative to a browser canvas.
    pub scale: f32,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    /// Show the key help bar.
    pub show_help: bool,
    pub counts: ParticleCounts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            animation: None,
            color: ColorTheme::default(),
            background: None,
            fps: 60,
            scale: 0.15,
            seed: None,
            show_help: true,
            counts: ParticleCounts::default(),
        }
    }
}

impl Config {
    /// Path of the config file in the platform config directory.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "motes").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the platform config directory.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text)?;
        config.validate()?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Save to the platform config directory.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(io_err)?;
        info!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid {
                field: "fps",
                reason: "must be at least 1",
            });
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "scale",
                reason: "must be a positive number",
            });
        }
        self.background_rgb()?;
        Ok(())
    }

    /// The parsed backdrop colour.
    pub fn background_rgb(&self) -> Result<Rgb, ColorParseError> {
        self.background
            .as_deref()
            .map_or(Ok(Rgb::BLACK), Rgb::parse)
    }
}
