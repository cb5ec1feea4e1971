//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{LogFormat, LogLevel};

/// Threat-intelligence domain feed pipeline.
#[derive(Debug, Parser)]
#[command(name = "feed_pipeline", version, about)]
pub struct Cli {
    /// JSON configuration file; built-in defaults are used when omitted
    #[arg(long, short = 'c', global = true, value_parser)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Log format: plain or json
    #[arg(long, value_enum, default_value = "plain", global = true)]
    pub log_format: LogFormat,

    /// Pipeline to run
    #[command(subcommand)]
    pub command: Command,
}

/// Pipelines exposed by the binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, extract, datestamp and archive today's feeds
    Daily,
    /// Stage downloads, then merge and deduplicate every feed file
    Merge,
    /// Recompute malware family counts for an existing merged file
    Analyze {
        /// Merged dataset file
        #[arg(value_parser)]
        file: PathBuf,
    },
}
