//! Configuration management for Tibber Timer
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files with support for environment variable
//! overrides of the Tibber credentials.

use crate::error::{Result, TimerError};
use crate::logging::parse_log_level;
use crate::run_profile::RunProfile;
use crate::schedule::ScheduleOptions;
use crate::timestamp::HourArithmetic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod defaults;

pub use defaults::{
    DEFAULT_LOG_FILE, DEFAULT_POLL_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TIBBER_ENDPOINT,
};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "TIBBER_TIMER_CONFIG";
/// Environment variable overriding `tibber.access_token`
pub const ACCESS_TOKEN_ENV: &str = "TIBBER_ACCESS_TOKEN";
/// Environment variable overriding `tibber.home_id`
pub const HOME_ID_ENV: &str = "TIBBER_HOME_ID";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tibber API access
    pub tibber: TibberConfig,

    /// Appliance run profile
    pub run_profile: RunProfile,

    /// Hour arithmetic used for the start offset
    pub hour_arithmetic: HourArithmetic,

    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Tibber API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TibberConfig {
    /// Tibber API access token
    pub access_token: String,

    /// Optional specific home ID; first home when empty
    pub home_id: String,

    /// GraphQL endpoint
    pub endpoint: String,

    /// Per-request timeout
    pub request_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Console-specific level; falls back to `level`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_level: Option<String>,

    /// File-specific level; falls back to `level`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_level: Option<String>,

    /// Path to log file (its directory receives the rolling files)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first existing default location, then
    /// apply environment overrides
    pub fn load() -> Result<Self> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV) {
            let explicit = PathBuf::from(explicit);
            if !explicit.exists() {
                return Err(TimerError::config(format!(
                    "{} points to missing file {}",
                    CONFIG_PATH_ENV,
                    explicit.display()
                )));
            }
            candidates.push(explicit);
        }
        candidates.extend(
            [
                "tibber_timer_config.yaml",
                "/data/tibber_timer_config.yaml",
                "/etc/tibber-timer/config.yaml",
            ]
            .iter()
            .map(PathBuf::from),
        );

        let mut config = match candidates.iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Override credentials from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override credentials from an arbitrary lookup; blank values are ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(token) = non_blank(ACCESS_TOKEN_ENV) {
            self.tibber.access_token = token.trim().to_string();
        }
        if let Some(home) = non_blank(HOME_ID_ENV) {
            self.tibber.home_id = home.trim().to_string();
        }
    }

    /// Scheduling knobs derived from this configuration
    pub const fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            arithmetic: self.hour_arithmetic,
            run_profile: self.run_profile,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tibber.endpoint.trim().is_empty() {
            return Err(TimerError::validation(
                "tibber.endpoint",
                "Endpoint cannot be empty",
            ));
        }

        if !self.tibber.endpoint.starts_with("http://") && !self.tibber.endpoint.starts_with("https://") {
            return Err(TimerError::validation(
                "tibber.endpoint",
                "Endpoint must be an http(s) URL",
            ));
        }

        if self.tibber.request_timeout_secs == 0 {
            return Err(TimerError::validation(
                "tibber.request_timeout_secs",
                "Must be greater than 0",
            ));
        }

        if self.run_profile.late_start_minute > 59 {
            return Err(TimerError::validation(
                "run_profile.late_start_minute",
                "Must be between 0 and 59",
            ));
        }

        // Validate polling interval
        if self.poll_interval_ms == 0 {
            return Err(TimerError::validation(
                "poll_interval_ms",
                "Must be greater than 0",
            ));
        }

        parse_log_level(&self.logging.level)
            .map_err(|e| TimerError::validation("logging.level", e.to_string()))?;
        for (field, value) in [
            ("logging.console_level", &self.logging.console_level),
            ("logging.file_level", &self.logging.file_level),
        ] {
            if let Some(level) = value {
                parse_log_level(level).map_err(|e| TimerError::validation(field, e.to_string()))?;
            }
        }

        Ok(())
    }
}
