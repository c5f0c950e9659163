//! UniPath Common Library
//!
//! Shared code for the UniPath gateway and seed tool:
//! - University directory core (records, criteria, filtering, options)
//! - Database models, repository, and the record store seam
//! - Error types and handling
//! - Configuration management
//! - Logging setup and metrics

pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod telemetry;

// Re-export commonly used types
pub use catalog::{FilterCriteria, UniversityRecord};
pub use config::AppConfig;
pub use db::{Repository, UniversityStore};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
