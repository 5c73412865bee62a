//! Database module

pub mod connection;
pub mod store;

pub use connection::{create_pool, DatabasePool};
pub use store::{DeadlineRepository, DeadlineStore};
