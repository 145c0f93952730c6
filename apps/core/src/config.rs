use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hotkey::{Chord, HotkeyError};
use crate::pins::PINS_FILE_NAME;

pub const APP_DIR_NAME: &str = "cmdsearch";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_HOTKEY: &str = "Ctrl+Alt+Space";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hotkey: String,
    /// Typed queries shorter than this only show pinned commands until the
    /// query is submitted.
    pub live_query_min_chars: usize,
    pub pins_path: Option<PathBuf>,
    pub menu_dump_path: Option<PathBuf>,
    pub log_level: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_HOTKEY.to_string(),
            live_query_min_chars: 4,
            pins_path: None,
            menu_dump_path: None,
            log_level: "info".to_string(),
            config_path: default_config_path(),
        }
    }
}

impl Config {
    pub fn focus_chord(&self) -> Result<Chord, HotkeyError> {
        self.hotkey.parse()
    }

    /// Explicit `pins_path`, else `pins.json` in the app data directory.
    pub fn pins_location(&self) -> Option<PathBuf> {
        self.pins_path
            .clone()
            .or_else(|| stable_app_data_dir().map(|dir| dir.join(PINS_FILE_NAME)))
    }
}

/// Per-user local data directory for the tool, when the platform has one.
pub fn stable_app_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME))
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir()
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
        .join(CONFIG_FILE_NAME)
}

/// Reads the config at `path` (default location when `None`). A missing
/// file yields the defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let mut cfg = match std::fs::read_to_string(&config_path) {
        Ok(raw) => toml::from_str::<Config>(&raw)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: config_path,
                source,
            })
        }
    };
    cfg.config_path = config_path;
    cfg.hotkey = crate::hotkey::canonicalize(&cfg.hotkey)
        .map_err(|error| ConfigError::Invalid(error.to_string()))?;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: cfg.config_path.clone(),
        source,
    };
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let encoded = toml::to_string_pretty(cfg)?;
    std::fs::write(&cfg.config_path, encoded).map_err(io_error)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.live_query_min_chars > 32 {
        return Err("live_query_min_chars out of range".into());
    }

    if !LOG_LEVELS.contains(&cfg.log_level.as_str()) {
        return Err(format!("unknown log_level '{}'", cfg.log_level));
    }

    if cfg
        .pins_path
        .as_ref()
        .is_some_and(|path| path.as_os_str().is_empty())
    {
        return Err("pins_path must not be empty".into());
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    cfg.focus_chord().map(|_| ()).map_err(|error| error.to_string())
}
