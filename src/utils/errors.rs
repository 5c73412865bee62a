//! Error handling for DeadlineBuddy
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for DeadlineBuddy application
#[derive(Error, Debug)]
pub enum DeadlineBuddyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid deadline format: {0}")]
    InvalidDateFormat(String),

    #[error("Deadline already passed: {0}")]
    DateInPast(NaiveDate),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for DeadlineBuddy operations
pub type Result<T> = std::result::Result<T, DeadlineBuddyError>;

impl DeadlineBuddyError {
    /// Check if the error should be answered with a reply to the submitting
    /// user rather than logged as an operational failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DeadlineBuddyError::InvalidDateFormat(_) | DeadlineBuddyError::DateInPast(_)
        )
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            DeadlineBuddyError::Database(_) => false,
            DeadlineBuddyError::Telegram(_) => true,
            DeadlineBuddyError::Config(_) => false,
            DeadlineBuddyError::InvalidDateFormat(_) => true,
            DeadlineBuddyError::DateInPast(_) => true,
            DeadlineBuddyError::Io(_) => true,
        }
    }
}
