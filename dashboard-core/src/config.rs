use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::error::ConfigError;

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const BUCKET_NAME_ENV: &str = "AWS_BUCKET_NAME";

/// Configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// bucket_name = "my-weather-archive"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub bucket_name: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let toml = toml::to_string_pretty(self)?;

        fs::write(path, toml).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// The two secrets a run needs, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub bucket_name: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}

impl Credentials {
    /// Resolve from the process environment (after loading `.env`), falling
    /// back to the config file for anything the environment lacks.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::resolve_with(|name| std::env::var(name).ok(), Config::load)
    }

    /// Like [`Credentials::resolve`], but only calls `load_file` when the
    /// environment is missing a value, so a broken or absent config file
    /// cannot fail a fully configured environment.
    pub fn resolve_with(
        lookup: impl Fn(&str) -> Option<String>,
        load_file: impl FnOnce() -> Result<Config, ConfigError>,
    ) -> Result<Self, ConfigError> {
        let env_complete = [API_KEY_ENV, BUCKET_NAME_ENV]
            .into_iter()
            .all(|name| lookup(name).is_some_and(|v| !v.trim().is_empty()));

        let file = if env_complete {
            Config::default()
        } else {
            load_file()?
        };

        Self::resolve(lookup, &file)
    }

    /// Environment values win over the file; empty strings count as unset.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        file: &Config,
    ) -> Result<Self, ConfigError> {
        let pick = |env_var: &'static str, fallback: &Option<String>, what: &'static str| {
            lookup(env_var)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| fallback.clone().filter(|v| !v.trim().is_empty()))
                .ok_or(ConfigError::Missing { what, env_var })
        };

        Ok(Self {
            api_key: pick(API_KEY_ENV, &file.api_key, "OpenWeather API key")?,
            bucket_name: pick(BUCKET_NAME_ENV, &file.bucket_name, "S3 bucket name")?,
        })
    }
}
