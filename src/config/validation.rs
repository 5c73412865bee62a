//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{DeadlineBuddyError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_schedule_config(&settings.schedule)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(DeadlineBuddyError::Config(
            "Bot token is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(DeadlineBuddyError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(DeadlineBuddyError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(DeadlineBuddyError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate schedule configuration
fn validate_schedule_config(config: &super::ScheduleConfig) -> Result<()> {
    if config.fire_hour > 23 {
        return Err(DeadlineBuddyError::Config(format!(
            "Fire hour must be 0-23, got {}",
            config.fire_hour
        )));
    }

    if config.fire_minute > 59 {
        return Err(DeadlineBuddyError::Config(format!(
            "Fire minute must be 0-59, got {}",
            config.fire_minute
        )));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(DeadlineBuddyError::Config(
            "Logging level is required".to_string(),
        ));
    }

    Ok(())
}
