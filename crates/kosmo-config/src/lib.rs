//! Configuration file handling for kosmo.
//!
//! The configuration lives in `config.toml` under the platform config
//! directory. A missing file yields the defaults; every field is optional.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use kosmo_core::{ColorTheme, Speed};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the configuration file inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Largest accepted star count.
pub const MAX_STAR_COUNT: usize = 200;

/// Largest accepted frame rate.
pub const MAX_FPS: u32 = 240;

/// Errors raised while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// User configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Star initial velocity multiplier.
    pub speed: f32,
    /// Number of stars in the field.
    pub star_count: usize,
    /// Whether the cursor spark trail is enabled.
    pub sparks: bool,
    /// Color theme.
    pub theme: ColorTheme,
    /// Target frames per second.
    pub fps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: 1.0,
            star_count: 30,
            sparks: true,
            theme: ColorTheme::default(),
            fps: 60,
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "kosmo")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load the configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Save the configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path()?)
    }

    /// Save the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Check every field is within its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Speed::new(self.speed).is_none() {
            return Err(ConfigError::Invalid {
                field: "speed",
                reason: format!("{} is not a positive finite number", self.speed),
            });
        }
        if !(1..=MAX_STAR_COUNT).contains(&self.star_count) {
            return Err(ConfigError::Invalid {
                field: "star_count",
                reason: format!("{} is outside 1..={MAX_STAR_COUNT}", self.star_count),
            });
        }
        if !(1..=MAX_FPS).contains(&self.fps) {
            return Err(ConfigError::Invalid {
                field: "fps",
                reason: format!("{} is outside 1..={MAX_FPS}", self.fps),
            });
        }
        Ok(())
    }

    /// The validated speed multiplier.
    pub fn speed(&self) -> Speed {
        Speed::new(self.speed).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.star_count, 30);
        assert!(config.sparks);
        assert_eq!(config.theme, ColorTheme::Dark);
        assert_eq!(config.fps, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("speed = 2.0\ntheme = \"light\"\n").unwrap();
        assert_eq!(config.speed, 2.0);
        assert_eq!(config.theme, ColorTheme::Light);
        assert_eq!(config.star_count, 30);
        assert!(config.sparks);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            speed: 0.5,
            star_count: 50,
            sparks: false,
            theme: ColorTheme::Light,
            fps: 30,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        fs::write(&path, "speed = -1.0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid { field: "speed", .. })
        ));

        fs::write(&path, "star_count = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid { field: "star_count", .. })
        ));

        fs::write(&path, "fps = 1000\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid { field: "fps", .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "theme = \"purple\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_speed_accessor() {
        let config = Config {
            speed: 3.0,
            ..Default::default()
        };
        assert_eq!(config.speed().get(), 3.0);
    }
}
