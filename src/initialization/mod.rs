//! Application initialization.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain or JSON output)
//! - HTTP client (optional request timeout)
//! - Archive backend

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

use crate::archive::ConfiguredArchive;
use crate::config::Config;
use crate::error_handling::InitializationError;

/// Builds the archive backend named in `config`, sharing `client` for uploads.
///
/// # Errors
///
/// Returns `InitializationError::ConfigError` if the backend settings are unusable.
pub fn init_archive(
    config: &Config,
    client: &reqwest::Client,
) -> Result<ConfiguredArchive, InitializationError> {
    ConfiguredArchive::from_settings(&config.archive, client.clone())
}
