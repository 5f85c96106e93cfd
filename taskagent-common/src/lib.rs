//! Shared foundation for the TaskAgent backend
//!
//! Holds the domain types (priority, category, priority source), the common
//! error type, and configuration resolution used by the API service.

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Category, Priority, PrioritySource};
