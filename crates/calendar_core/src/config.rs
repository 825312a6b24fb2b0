//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve database, snapshot and log locations.
//! - Read optional overrides from a TOML file.
//!
//! # Invariants
//! - Every resolved path is absolute.
//! - Relative paths inside a config file resolve against the file's directory.
//! - Paths not set in the file live under `data_dir`.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "calendar";
const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "calendar.sqlite3";
const SNAPSHOT_FILE_NAME: &str = "data.xml";
const LOG_DIR_NAME: &str = "logs";

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// Config file is not valid TOML or has unknown keys.
    Parse { path: PathBuf, source: toml::de::Error },
    /// Platform has no data directory and none was given.
    NoDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::NoDataDir => write!(f, "could not determine a data directory"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::NoDataDir => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    database_path: Option<PathBuf>,
    snapshot_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
    database_enabled: Option<bool>,
}

/// Resolved calendar configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    /// `false` runs in file-only mode.
    pub database_enabled: bool,
}

impl CalendarConfig {
    /// Defaults rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = absolutize(data_dir.as_ref());
        Self {
            database_path: data_dir.join(DATABASE_FILE_NAME),
            snapshot_path: data_dir.join(SNAPSHOT_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
            database_enabled: true,
            data_dir,
        }
    }

    /// Platform data directory, e.g. `~/.local/share/calendar`.
    pub fn default_data_dir() -> ConfigResult<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Platform config file, e.g. `~/.config/calendar/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, the platform config file
    /// is used when present, and defaults otherwise.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::with_data_dir(Self::default_data_dir()?)),
            },
        }
    }

    /// Reads one TOML config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = absolutize(path.parent().unwrap_or_else(|| Path::new(".")));
        Self::from_toml_str(&text, &base_dir).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses TOML text, resolving relative paths against `base_dir`.
    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(text)?;
        let data_dir = match file.data_dir {
            Some(dir) => base_dir.join(dir),
            None => Self::default_data_dir().unwrap_or_else(|_| base_dir.to_path_buf()),
        };

        let mut config = Self::with_data_dir(data_dir);
        if let Some(path) = file.database_path {
            config.database_path = base_dir.join(path);
        }
        if let Some(path) = file.snapshot_path {
            config.snapshot_path = base_dir.join(path);
        }
        if let Some(path) = file.log_dir {
            config.log_dir = base_dir.join(path);
        }
        if let Some(level) = file.log_level {
            config.log_level = level;
        }
        if let Some(enabled) = file.database_enabled {
            config.database_enabled = enabled;
        }
        Ok(config)
    }

    /// Moves every default-located path under `data_dir`.
    pub fn rebase(mut self, data_dir: impl AsRef<Path>) -> Self {
        let rebased = Self::with_data_dir(data_dir);
        if self.database_path == self.data_dir.join(DATABASE_FILE_NAME) {
            self.database_path = rebased.database_path;
        }
        if self.snapshot_path == self.data_dir.join(SNAPSHOT_FILE_NAME) {
            self.snapshot_path = rebased.snapshot_path;
        }
        if self.log_dir == self.data_dir.join(LOG_DIR_NAME) {
            self.log_dir = rebased.log_dir;
        }
        self.data_dir = rebased.data_dir;
        self
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
