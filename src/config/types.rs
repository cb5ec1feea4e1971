//! Configuration types and CLI option enums.
//!
//! This module defines the library configuration (deserializable from a JSON
//! file) and the enums shared with the command-line interface.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::config::constants::{
    DEFAULT_ARCHIVE_BUCKET, DEFAULT_DATA_FORMATS, DEFAULT_DOWNLOADS_DIR, DEFAULT_EXCLUDED_FILES,
    DEFAULT_PROCESSING_DIR, DEFAULT_SOURCES,
};
use crate::error_handling::{InitializationError, PipelineError};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// A feed to download.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FeedSource {
    /// Location of the feed
    pub url: String,
    /// Name to write the body under; defaults to the last URL path segment
    #[serde(default)]
    pub filename: Option<String>,
}

impl FeedSource {
    /// Creates a source with an explicit target file name.
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: Some(filename.into()),
        }
    }

    /// Returns the file name the body is written under.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidSource` if no name was configured and the
    /// URL has no usable last path segment.
    pub fn expected_filename(&self) -> Result<String, PipelineError> {
        if let Some(name) = self.filename.as_deref().filter(|n| !n.is_empty()) {
            return Ok(name.to_string());
        }

        let parsed =
            url::Url::parse(&self.url).map_err(|_| PipelineError::InvalidSource(self.url.clone()))?;
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .ok_or_else(|| PipelineError::InvalidSource(self.url.clone()))
    }
}

/// Where archived files are sent.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum ArchiveBackend {
    /// Mirror objects into `<root>/<bucket>/<key>` on the local filesystem
    Local {
        /// Root directory of the mirror
        root: PathBuf,
    },
    /// Upload objects to an HTTP object store (GCS JSON API compatible)
    Http {
        /// Base URL of the object store, e.g. `https://storage.googleapis.com`
        endpoint: String,
        /// Bearer token
        #[serde(default)]
        token: Option<String>,
        /// File holding the bearer token (read once at construction)
        #[serde(default)]
        token_file: Option<PathBuf>,
    },
}

/// Archive hand-off settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArchiveSettings {
    /// Bucket identifier
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Storage backend
    #[serde(flatten)]
    pub backend: ArchiveBackend,
}

fn default_bucket() -> String {
    DEFAULT_ARCHIVE_BUCKET.to_string()
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            backend: ArchiveBackend::Local {
                root: PathBuf::from("./data/archive"),
            },
        }
    }
}

/// Library configuration.
///
/// Every stage receives its directories from here; nothing depends on the
/// process working directory.
///
/// # Examples
///
/// ```no_run
/// use feed_pipeline::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     downloads_dir: PathBuf::from("/srv/feeds/downloads"),
///     processing_dir: PathBuf::from("/srv/feeds/staging"),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Raw fetched files land here
    pub downloads_dir: PathBuf,

    /// Staged files, the journal and the merged dataset live here
    pub processing_dir: PathBuf,

    /// Feeds fetched by the daily pipeline, in order
    pub sources: Vec<FeedSource>,

    /// File names that are never renamed, staged, parsed or archived
    pub excluded_files: Vec<String>,

    /// Extensions (with leading dot) eligible for archival
    pub data_formats: Vec<String>,

    /// Three-character file prefix to archive root directory
    pub file_map: BTreeMap<String, String>,

    /// Archive hand-off
    pub archive: ArchiveSettings,

    /// Optional per-request timeout in seconds (no timeout when unset)
    pub timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from(DEFAULT_DOWNLOADS_DIR),
            processing_dir: PathBuf::from(DEFAULT_PROCESSING_DIR),
            sources: DEFAULT_SOURCES
                .iter()
                .map(|(url, name)| FeedSource::new(*url, *name))
                .collect(),
            excluded_files: DEFAULT_EXCLUDED_FILES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            data_formats: DEFAULT_DATA_FORMATS.iter().map(|s| s.to_string()).collect(),
            file_map: BTreeMap::from([
                ("dga".to_string(), "bambenek".to_string()),
                ("top".to_string(), "umbrella".to_string()),
            ]),
            archive: ArchiveSettings::default(),
            timeout_seconds: None,
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, InitializationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InitializationError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
            .map_err(|e| InitializationError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parses configuration from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Whether `file_name` is on the exclusion list (matched on the full name or its stem).
    pub fn is_excluded(&self, file_name: &str) -> bool {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        self.excluded_files
            .iter()
            .any(|excluded| excluded == file_name || excluded == stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.file_map.get("dga").map(String::as_str), Some("bambenek"));
        assert!(config.timeout_seconds.is_none());
        assert!(config.data_formats.contains(&".csv".to_string()));
    }

    #[test]
    fn test_config_from_json_partial() {
        let config = Config::from_json_str(
            r#"{
                "downloads_dir": "/tmp/dl",
                "file_map": {"dga": "dga-archive"},
                "archive": {"bucket": "b1", "backend": "http", "endpoint": "http://localhost:1", "token": "t"}
            }"#,
        )
        .expect("config should parse");

        assert_eq!(config.downloads_dir, PathBuf::from("/tmp/dl"));
        assert_eq!(config.processing_dir, PathBuf::from(DEFAULT_PROCESSING_DIR));
        assert_eq!(config.file_map.len(), 1);
        assert_eq!(config.archive.bucket, "b1");
        assert_eq!(
            config.archive.backend,
            ArchiveBackend::Http {
                endpoint: "http://localhost:1".to_string(),
                token: Some("t".to_string()),
                token_file: None,
            }
        );
    }

    #[test]
    fn test_config_from_json_invalid() {
        assert!(Config::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_is_excluded_matches_name_and_stem() {
        let config = Config::default();
        assert!(config.is_excluded(".DS_Store"));
        assert!(config.is_excluded("__init__.py"));
        assert!(!config.is_excluded("top-1m.csv"));
    }

    #[test]
    fn test_expected_filename_from_url() {
        let source = FeedSource {
            url: "http://example.com/feeds/dga-feed-high.csv".to_string(),
            filename: None,
        };
        assert_eq!(source.expected_filename().unwrap(), "dga-feed-high.csv");

        let explicit = FeedSource::new("http://example.com/x", "top-1m.csv.zip");
        assert_eq!(explicit.expected_filename().unwrap(), "top-1m.csv.zip");

        let bare = FeedSource {
            url: "http://example.com/".to_string(),
            filename: None,
        };
        assert!(bare.expected_filename().is_err());
    }
}
