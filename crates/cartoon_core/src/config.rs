//! Runtime configuration for the cartoon list.
//!
//! # Invariants
//! - Data paths are absolute after `validate()` succeeds.
//! - `api_url` is an http(s) URL after `validate()` succeeds.

use crate::logging::default_log_level;
use crate::remote::DEFAULT_API_URL;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DATA_DIR_ENV: &str = "CARTOONS_DATA_DIR";
const API_URL_ENV: &str = "CARTOONS_API_URL";
const LOG_LEVEL_ENV: &str = "CARTOONS_LOG_LEVEL";
const DATABASE_FILE_NAME: &str = "cartoons.sqlite3";
const PREFERENCES_FILE_NAME: &str = "preferences.json";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api_url is invalid: `{0}`")]
    InvalidApiUrl(String),
    #[error("{field} must be an absolute path, got `{value}`")]
    RelativePath { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub database_path: PathBuf,
    pub preferences_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Derives every file location from one data directory.
    pub fn for_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            database_path: data_dir.join(DATABASE_FILE_NAME),
            preferences_path: data_dir.join(PREFERENCES_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
        }
    }

    /// Builds config from `CARTOONS_*` environment variables.
    ///
    /// Unset or blank variables fall back to defaults.
    pub fn from_env() -> Self {
        let data_dir = non_blank_env(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("cartoons"));

        let mut config = Self::for_data_dir(data_dir);
        if let Some(api_url) = non_blank_env(API_URL_ENV) {
            config.api_url = api_url;
        }
        if let Some(level) = non_blank_env(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api_url(&self.api_url)?;
        require_absolute("database_path", &self.database_path)?;
        require_absolute("preferences_path", &self.preferences_path)?;
        require_absolute("log_dir", &self.log_dir)?;
        Ok(())
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_api_url(raw: &str) -> Result<(), ConfigError> {
    match reqwest::Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(ConfigError::InvalidApiUrl(raw.to_string())),
    }
}

fn require_absolute(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_absolute() {
        return Ok(());
    }
    Err(ConfigError::RelativePath {
        field,
        value: path.display().to_string(),
    })
}
