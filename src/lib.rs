//! DeadlineBuddy Telegram Bot
//!
//! A Telegram bot that tracks one deadline date per group chat and sends
//! each group an escalating daily countdown reminder. The library exposes
//! the deadline store, the countdown scheduler, the message composer and
//! the group lifecycle controller as injectable components.

#![allow(non_snake_case)]

pub mod config;
pub mod controller;
pub mod database;
pub mod messages;
pub mod models;
pub mod scheduler;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{DeadlineBuddyError, Result};

// Re-export main components for easy access
pub use controller::{DeadlineCache, GroupLifecycleController};
pub use database::{DeadlineRepository, DeadlineStore};
pub use scheduler::CountdownScheduler;
pub use transport::{TelegramTransport, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
