use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::PaddockError;
use crate::ergast::{DEFAULT_BASE_URL, DEFAULT_SEASON};

const CONFIG_DIR_NAME: &str = "paddock";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_REQUEST_TIMEOUT_S: u64 = 10;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the Ergast compatible API, without trailing slash
    pub base_url: String,
    pub season: String,
    pub request_timeout_s: u64,
    /// Directory holding `img/<familyname>.jpg` driver portraits
    pub asset_dir: Option<PathBuf>,
    /// Flag table replacing the built-in one
    pub flags_file: Option<PathBuf>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            season: DEFAULT_SEASON.to_string(),
            request_timeout_s: DEFAULT_REQUEST_TIMEOUT_S,
            asset_dir: None,
            flags_file: None,
            window_width: 1100.,
            window_height: 800.,
        }
    }
}

impl AppConfig {
    pub fn local_path() -> Option<PathBuf> {
        Some(
            dirs::config_dir()?
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        )
    }

    /// Loads the config saved in the user's config directory, if any.
    pub fn from_local_file() -> Result<Option<Self>, PaddockError> {
        match Self::local_path() {
            Some(path) if path.exists() => Self::from_path(&path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, PaddockError> {
        let file =
            std::fs::File::open(path).map_err(|e| PaddockError::ConfigIOError { source: e })?;
        serde_json::from_reader(file).map_err(|e| PaddockError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), PaddockError> {
        let config_path = Self::local_path().ok_or(PaddockError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), PaddockError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PaddockError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| PaddockError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| PaddockError::ConfigSerializeError { source: e })
    }
}

/// The config read at startup. An unreadable file is replaced by defaults for
/// this run, and is not writable so the user's file is never overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredConfig {
    pub config: AppConfig,
    pub writable: bool,
}

impl StoredConfig {
    pub fn load() -> Self {
        match AppConfig::local_path() {
            Some(path) => Self::load_from(&path),
            None => Self {
                config: AppConfig::default(),
                writable: false,
            },
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self {
                config: AppConfig::default(),
                writable: true,
            };
        }
        match AppConfig::from_path(path) {
            Ok(config) => Self {
                config,
                writable: true,
            },
            Err(e) => {
                warn!("Ignoring unreadable config file {:?}: {}", path, e);
                Self {
                    config: AppConfig::default(),
                    writable: false,
                }
            }
        }
    }
}
