use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "tetris.json";
/// Environment variable overriding the config location.
pub const CONFIG_ENV: &str = "TETRIS_CONFIG";

/// Runtime settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sound_dir: PathBuf,
    pub volume: f32,
    pub muted: bool,
    pub seed: Option<u64>,
    pub font_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sound_dir: PathBuf::from("sounds"),
            volume: 0.5,
            muted: false,
            seed: None,
            font_path: None,
        }
    }
}

impl Config {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        let mut config: Config = serde_json::from_str(data)?;
        config.volume = config.volume.clamp(0.0, 1.0);
        Ok(config)
    }

    /// Reads `path`. A missing file is `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_json(&data)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Loads from `$TETRIS_CONFIG` or `tetris.json`, falling back to defaults
    /// on any problem.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        match Self::read(&path) {
            Ok(Some(config)) => {
                info!("loaded config from {}", path.display());
                config
            }
            Ok(None) => Config::default(),
            Err(e) => {
                warn!("{e}; using defaults");
                Config::default()
            }
        }
    }
}
