//! Planner runtime configuration.
//!
//! # Responsibility
//! - Collect storage location, slot keys, logging and messaging defaults.
//! - Parse host-provided JSON settings with per-field defaults.
//!
//! # Invariants
//! - The two collection keys are non-empty and distinct.
//! - `default_country_code` is digits only.

use crate::logging::default_log_level;
use crate::messaging::SmsLinkStyle;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "planner.sqlite3";
pub const DEFAULT_PEOPLE_KEY: &str = "wedding_people";
pub const DEFAULT_EXPENSES_KEY: &str = "wedding_expenses";
pub const DEFAULT_COUNTRY_CODE: &str = "90";

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid planner config: {err}"),
            Self::Invalid(message) => write!(f, "invalid planner config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings supplied by the host app at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// SQLite file holding the key-value area.
    pub db_path: PathBuf,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
    pub people_key: String,
    pub expenses_key: String,
    /// Prefixed to WhatsApp numbers that lack it.
    pub default_country_code: String,
    /// Batched SMS link form understood by the host platform.
    pub sms_link_style: SmsLinkStyle,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            people_key: DEFAULT_PEOPLE_KEY.to_string(),
            expenses_key: DEFAULT_EXPENSES_KEY.to_string(),
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            sms_link_style: SmsLinkStyle::default(),
        }
    }
}

impl PlannerConfig {
    /// Parses JSON settings; omitted fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.people_key.trim().is_empty() || self.expenses_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "collection keys cannot be empty".to_string(),
            ));
        }
        if self.people_key == self.expenses_key {
            return Err(ConfigError::Invalid(format!(
                "people and expenses must use different keys, both are `{}`",
                self.people_key
            )));
        }
        if !self
            .default_country_code
            .chars()
            .all(|ch| ch.is_ascii_digit())
        {
            return Err(ConfigError::Invalid(format!(
                "country code must be digits only, got `{}`",
                self.default_country_code
            )));
        }
        Ok(())
    }
}
