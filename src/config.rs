//! Startup configuration resolved from the environment and the user's home
//! directory.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".jayadhani";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "jayadhani.sqlite";
/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "jayadhani.log";
/// Gemini model used for reflections unless overridden.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3.1-pro-preview";

const ENV_DATA_DIR: &str = "JAYADHANI_DATA_DIR";
const ENV_CATALOG: &str = "JAYADHANI_CATALOG";
const ENV_MODEL: &str = "JAYADHANI_GEMINI_MODEL";
const ENV_API_KEYS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// External hymn catalog; the bundled one is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Gemini API key. Reflections run offline without one.
    pub api_key: Option<String>,
    pub model: String,
}

impl Config {
    /// Resolve configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = match get(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        Ok(Self {
            data_dir,
            catalog_path: get(ENV_CATALOG).map(PathBuf::from),
            api_key: ENV_API_KEYS.iter().find_map(|key| get(*key)),
            model: get(ENV_MODEL).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }
}

/// `~/.jayadhani`, resolved through the platform's notion of a home directory.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
