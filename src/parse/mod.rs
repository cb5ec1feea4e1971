//! Feed parsing and normalization.
//!
//! This module turns a staged feed file into [`DomainRecord`]s:
//! - Ranking feeds (`top*`): headerless `rank,domain` tables
//! - DGA feeds (`dga*`): preamble, then `domain,description,date` rows
//!
//! Every record is dated from the file name's ingestion token, and each parsed
//! file yields one journal entry with its read latency and in-memory size.

mod dga;
mod ranking;

use std::path::Path;

use log::{info, warn};

use crate::datestamp::file_date;
use crate::error_handling::PipelineError;
use crate::models::{DomainRecord, FeedType, FileState, ProcessingLogEntry, SourceFile};
use crate::utils::{records_megabytes, timed};

pub use dga::malware_family;

/// Records normalized from one feed file.
#[derive(Debug, Clone)]
pub struct ParsedBatch {
    /// The file, tagged `Parsed`
    pub file: SourceFile,
    /// Normalized records in file order
    pub records: Vec<DomainRecord>,
    /// Journal entry for the read
    pub entry: ProcessingLogEntry,
}

/// Parses the feed file `file` located in `dir`.
///
/// Returns `Ok(None)` for files whose type cannot be inferred from the name
/// prefix; these are skipped with a warning.
///
/// # Errors
///
/// - `MissingDateToken` / `MalformedDateToken` if the name carries no usable date
/// - `FeedRead` / `Io` if the file cannot be read
pub fn parse_source_file(
    dir: &Path,
    file: &SourceFile,
) -> Result<Option<ParsedBatch>, PipelineError> {
    if file.inferred_type == FeedType::Unknown {
        warn!("Unknown feed type for {}, skipping", file.name);
        return Ok(None);
    }

    let date = file_date(&file.name)?;
    let path = dir.join(&file.name);

    let (result, elapsed) = timed(|| match file.inferred_type {
        FeedType::RankingFeed => ranking::read_ranking_feed(&path, date),
        FeedType::DgaFeed => dga::read_dga_feed(&path, date),
        FeedType::Unknown => Ok(Vec::new()),
    });
    let records = result?;
    let memory = records_megabytes(&records);

    info!(
        "Parsed {} ({}): {} record(s) in {:.3}s",
        file.name,
        file.inferred_type.as_ref(),
        records.len(),
        elapsed
    );

    Ok(Some(ParsedBatch {
        file: file.clone().advance(FileState::Parsed),
        entry: ProcessingLogEntry::for_file(&file.name, date, elapsed, memory),
        records,
    }))
}
