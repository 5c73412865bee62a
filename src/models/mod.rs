//! Data models module

pub mod deadline;

pub use deadline::GroupDeadline;
