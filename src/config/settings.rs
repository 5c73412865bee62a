//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub schedule: ScheduleConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Daily reminder schedule configuration.
///
/// One wall-clock fire time, interpreted in UTC, applies to every group.
/// The confirmation message renders this same value, so the text shown to
/// users and the actual trigger cannot drift apart.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ScheduleConfig {
    pub fire_hour: u32,
    pub fire_minute: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl ScheduleConfig {
    /// Daily fire time as a wall-clock time. Falls back to midnight for
    /// out-of-range values, which `validate` rejects before this is used.
    pub fn fire_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.fire_hour, self.fire_minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Human-readable fire time for user-facing messages, e.g. "07:00 UTC".
    pub fn display(&self) -> String {
        format!("{:02}:{:02} UTC", self.fire_hour, self.fire_minute)
    }
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("DEADLINEBUDDY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::DeadlineBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/deadlinebuddy".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            schedule: ScheduleConfig {
                fire_hour: 7,
                fire_minute: 0,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/deadlinebuddy".to_string(),
            },
        }
    }
}
