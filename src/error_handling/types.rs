//! Error type definitions.
//!
//! This module defines all error types used throughout the pipeline.

use std::path::{Path, PathBuf};

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::{AsRefStr, EnumIter as EnumIterMacro};
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Configuration file missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Errors raised by pipeline stages.
///
/// Every variant aborts the run: the pipeline has no retry or partial-success path.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A feed source answered with anything other than 200.
    #[error("HTTP error {status} for {url}")]
    HttpStatus {
        /// Source URL
        url: String,
        /// Status code received
        status: u16,
    },

    /// The request could not be completed (connect, body read, ...).
    #[error("HTTP request to {url} failed: {source}")]
    HttpRequest {
        /// Source URL
        url: String,
        /// Underlying client error
        #[source]
        source: ReqwestError,
    },

    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// An archive could not be unpacked.
    #[error("Corrupt archive {}: {reason}", .path.display())]
    CorruptArchive {
        /// Archive path
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// A file name lacks the `YYYY-MM-DD` ingestion token where one is required.
    #[error("No YYYY-MM-DD date token in file name '{0}'")]
    MissingDateToken(String),

    /// The token matched the pattern but is not a calendar date.
    #[error("Malformed date token '{token}' in file name '{name}'")]
    MalformedDateToken {
        /// File name
        name: String,
        /// Offending token
        token: String,
    },

    /// A feed file could not be read as a table.
    #[error("Failed to read feed {}: {source}", .path.display())]
    FeedRead {
        /// Feed path
        path: PathBuf,
        /// CSV reader error
        #[source]
        source: csv::Error,
    },

    /// A table could not be written.
    #[error("Failed to write table {}: {source}", .path.display())]
    TableWrite {
        /// Output path
        path: PathBuf,
        /// CSV writer error
        #[source]
        source: csv::Error,
    },

    /// The archive collaborator rejected an upload.
    #[error("Archive upload of {} to {bucket}/{key} failed: {reason}", .path.display())]
    ArchiveUpload {
        /// Local file
        path: PathBuf,
        /// Bucket identifier
        bucket: String,
        /// Destination key
        key: String,
        /// Failure description
        reason: String,
    },

    /// A feed source descriptor cannot be turned into a file name.
    #[error("Invalid feed source '{0}'")]
    InvalidSource(String),
}

impl PipelineError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the pipeline stage the error belongs to.
    pub fn stage(&self) -> ErrorStage {
        match self {
            PipelineError::HttpStatus { .. }
            | PipelineError::HttpRequest { .. }
            | PipelineError::InvalidSource(_) => ErrorStage::Fetch,
            PipelineError::CorruptArchive { .. } => ErrorStage::Extract,
            PipelineError::MissingDateToken(_) | PipelineError::MalformedDateToken { .. } => {
                ErrorStage::Datestamp
            }
            PipelineError::FeedRead { .. } => ErrorStage::Parse,
            PipelineError::TableWrite { .. } => ErrorStage::Merge,
            PipelineError::ArchiveUpload { .. } => ErrorStage::Archive,
            PipelineError::Io { .. } => ErrorStage::Filesystem,
        }
    }
}

/// Coarse classification of pipeline errors, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorStage {
    /// Downloading feeds
    Fetch,
    /// Unpacking archives
    Extract,
    /// Date token handling
    Datestamp,
    /// Feed parsing
    Parse,
    /// Merging and writing the dataset
    Merge,
    /// Archive hand-off
    Archive,
    /// Generic filesystem failure
    Filesystem,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_http_status_message() {
        let err = PipelineError::HttpStatus {
            url: "http://example.com/feed.csv".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP error 404 for http://example.com/feed.csv");
        assert_eq!(err.stage(), ErrorStage::Fetch);
    }

    #[test]
    fn test_io_error_carries_path() {
        let err = PipelineError::io(
            Path::new("/tmp/missing"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing"));
        assert_eq!(err.stage(), ErrorStage::Filesystem);
    }

    #[test]
    fn test_date_errors_are_datestamp_stage() {
        assert_eq!(
            PipelineError::MissingDateToken("top-1m.csv".into()).stage(),
            ErrorStage::Datestamp
        );
        assert_eq!(
            PipelineError::MalformedDateToken {
                name: "dga-2020-13-45.csv".into(),
                token: "2020-13-45".into()
            }
            .stage(),
            ErrorStage::Datestamp
        );
    }

    #[test]
    fn test_error_stage_names_are_unique() {
        let names: std::collections::HashSet<_> =
            ErrorStage::iter().map(|s| s.as_ref().to_string()).collect();
        assert_eq!(names.len(), ErrorStage::iter().count());
        assert!(names.contains("filesystem"));
    }
}
