//! Configuration constants.
//!
//! This module defines the fixed conventions of the pipeline: feed locations,
//! file naming rules, parser layout and the journal format.

/// The only HTTP status accepted from a feed source.
pub const HTTP_SUCCESS: u16 = 200;

/// Default feed sources (URL, file name written into the download directory).
pub const DEFAULT_SOURCES: &[(&str, &str)] = &[
    (
        "http://s3-us-west-1.amazonaws.com/umbrella-static/top-1m.csv.zip",
        "top-1m.csv.zip",
    ),
    (
        "http://osint.bambenekconsulting.com/feeds/dga-feed-high.csv",
        "dga-feed-high.csv",
    ),
];

/// Default download (inbox) directory.
pub const DEFAULT_DOWNLOADS_DIR: &str = "./data/local/downloads";
/// Default processing (staging) directory.
pub const DEFAULT_PROCESSING_DIR: &str = "./data/local/staging";

/// File names that are never renamed, staged, parsed or archived.
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &[".DS_Store", "__init__.py"];

/// Extensions eligible for archival.
pub const DEFAULT_DATA_FORMATS: &[&str] = &[".csv", ".txt"];

/// Default archive bucket name.
pub const DEFAULT_ARCHIVE_BUCKET: &str = "requex-archive";

// Naming conventions
/// Embedded ingestion date token (`YYYY-MM-DD`).
pub const DATE_TOKEN_PATTERN: &str = r"\d{4}-\d{2}-\d{2}";
/// Format of the date token.
pub const DATE_TOKEN_FORMAT: &str = "%Y-%m-%d";
/// Number of leading file-name characters used to infer the feed type and archive root.
pub const FILE_PREFIX_LEN: usize = 3;
/// Prefix of ranking (popular domains) feed files.
pub const RANKING_FEED_PREFIX: &str = "top";
/// Prefix of DGA feed files.
pub const DGA_FEED_PREFIX: &str = "dga";

// Parser layout
/// Lines of licensing/comment preamble at the top of a DGA feed.
pub const DGA_PREAMBLE_LINES: usize = 16;
/// Boilerplate that precedes the family name in DGA descriptions.
pub const DGA_MALWARE_PREFIX: &str = "Domain used by ";
/// Malware label given to ranking feed records.
pub const NO_MALWARE_LABEL: &str = "NA";

// Outputs
/// Journal file name inside the processing directory.
pub const JOURNAL_FILE_NAME: &str = "data_prep_log.log";
/// Timestamp format used by journal lines.
pub const JOURNAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M";
/// Merged dataset file name prefix (`merged-<date>.csv`).
pub const MERGED_FILE_PREFIX: &str = "merged-";
/// Header row of the merged dataset.
pub const MERGED_HEADER: [&str; 4] = ["domain", "malware", "dga", "date"];

/// Bytes per megabyte for journal memory figures.
pub const MB: f64 = 1024.0 * 1024.0;
