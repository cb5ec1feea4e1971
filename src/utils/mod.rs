//! Utility functions.
//!
//! This module provides:
//! - Filesystem listing and moving helpers
//! - Timing and memory figures for the processing journal
//! - Regex compilation for constant patterns

mod fs;
mod timing;

use regex::Regex;

pub use fs::{ensure_dir, list_files, move_file};
pub use timing::{records_megabytes, timed};

/// Compiles a constant regex pattern.
///
/// Only used for patterns that are compiled into the binary, so a failure is a
/// programming error.
pub(crate) fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}
