//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (`FetchError`, `ConfigError`, `ScanError`, ...)
//! - Classification of transport errors into the fetch error taxonomy
//! - Processing statistics tracking

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::ProcessingStats;
pub use types::{
    ConfigError, ErrorType, FetchError, FetchErrorKind, InitializationError, ScanError,
};
