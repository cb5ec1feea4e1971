//! feed_pipeline library: threat-intelligence domain feed ingestion
//!
//! This library downloads a ranked "popular domains" feed and a malware-labeled
//! DGA domain feed, normalizes both into one record schema, deduplicates
//! domains across feeds and ingestion days, and writes a merged dataset plus a
//! processing journal. Raw files are handed to a blob archive.
//!
//! # Example
//!
//! ```no_run
//! use feed_pipeline::{run_merge, Config};
//! use std::path::PathBuf;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     downloads_dir: PathBuf::from("/srv/feeds/downloads"),
//!     processing_dir: PathBuf::from("/srv/feeds/staging"),
//!     ..Default::default()
//! };
//!
//! let report = run_merge(&config)?;
//! for count in &report.counts {
//!     println!("{:>24} {}", count.label, count.domains);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The daily pipeline is async and needs a Tokio runtime. The merge pipeline
//! and analysis are synchronous.

#![warn(missing_docs)]

pub mod analyze;
pub mod archive;
pub mod cli;
pub mod config;
pub mod datestamp;
pub mod error_handling;
pub mod extract;
pub mod fetch;
pub mod initialization;
pub mod journal;
pub mod merge;
pub mod models;
pub mod parse;
mod run;
pub mod stage;
mod utils;

// Re-export public API
pub use analyze::{analyze_merged, AnalysisReport};
pub use archive::{BlobArchive, ConfiguredArchive, HttpArchive, LocalArchive};
pub use config::{Config, FeedSource, LogFormat, LogLevel};
pub use error_handling::{InitializationError, PipelineError};
pub use models::{DomainRecord, MalwareFamilyCount, ProcessingLogEntry, SourceFile};
pub use run::{run_daily, run_daily_for_date, run_merge, run_merge_for_date, DailyReport, MergeReport};
