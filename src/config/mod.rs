//! Application configuration and constants.
//!
//! This module provides:
//! - Pipeline conventions (file naming, parser layout, journal format)
//! - The library `Config` and its JSON loading
//! - CLI option enums shared with the binary

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{ArchiveBackend, ArchiveSettings, Config, FeedSource, LogFormat, LogLevel};
