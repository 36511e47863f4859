//! Runtime configuration resolved from the process environment.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Every field has a usable default; resolution only fails on values
//!   that are present but malformed.

use crate::logging::{default_log_level, normalize_level};
use crate::service::article_service::ARTICLES_PER_PAGE;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ECOAWARE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ECOAWARE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ECOAWARE_LOG_DIR";
pub const ARTICLES_PER_PAGE_ENV: &str = "ECOAWARE_ARTICLES_PER_PAGE";

const DEFAULT_DB_FILE_NAME: &str = "ecoaware.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "ecoaware-logs";

#[derive(Debug)]
pub enum ConfigError {
    InvalidLogLevel { raw: String },
    InvalidPageSize { raw: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel { raw } => write!(
                f,
                "{LOG_LEVEL_ENV}: unsupported log level `{raw}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidPageSize { raw } => write!(
                f,
                "{ARTICLES_PER_PAGE_ENV}: expected a positive integer, got `{raw}`"
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
    pub articles_per_page: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let temp_dir = std::env::temp_dir();
        Self {
            db_path: temp_dir.join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: temp_dir.join(DEFAULT_LOG_DIR_NAME),
            articles_per_page: ARTICLES_PER_PAGE,
        }
    }
}

impl AppConfig {
    /// Resolves configuration from `ECOAWARE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = non_blank(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(LOG_LEVEL_ENV) {
            config.log_level =
                normalize_level(&level).map_err(|_| ConfigError::InvalidLogLevel { raw: level })?;
        }
        if let Some(dir) = non_blank(LOG_DIR_ENV) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(raw) = non_blank(ARTICLES_PER_PAGE_ENV) {
            config.articles_per_page = raw
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidPageSize { raw })?;
        }
        Ok(config)
    }
}
