//! Core data types shared by the pipeline stages.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::config::{
    DGA_FEED_PREFIX, FILE_PREFIX_LEN, NO_MALWARE_LABEL, RANKING_FEED_PREFIX,
};

/// Feed type inferred from the first three characters of a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FeedType {
    /// Popularity-ranked domains (`top*`)
    RankingFeed,
    /// Malware-family-labeled DGA domains (`dga*`)
    DgaFeed,
    /// Anything else; never parsed
    Unknown,
}

impl FeedType {
    /// Infers the feed type from a file name prefix.
    pub fn infer(file_name: &str) -> Self {
        match file_prefix(file_name) {
            RANKING_FEED_PREFIX => FeedType::RankingFeed,
            DGA_FEED_PREFIX => FeedType::DgaFeed,
            _ => FeedType::Unknown,
        }
    }
}

/// Returns the first `FILE_PREFIX_LEN` characters of a file name (or all of it if shorter).
pub fn file_prefix(file_name: &str) -> &str {
    match file_name.char_indices().nth(FILE_PREFIX_LEN) {
        Some((idx, _)) => &file_name[..idx],
        None => file_name,
    }
}

/// Last stage that produced or handled a file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum FileState {
    /// Written by the fetcher
    Fetched,
    /// Unpacked from an archive
    Extracted,
    /// Carries an ingestion date token
    Datestamped,
    /// Moved into the processing directory
    Staged,
    /// Normalized into records
    Parsed,
}

/// A feed file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name including extension, without directory
    pub name: String,
    /// Extension including the leading dot, empty when there is none
    pub extension: String,
    /// Feed type inferred from the name prefix
    pub inferred_type: FeedType,
    /// Lifecycle tag
    pub state: FileState,
}

impl SourceFile {
    /// Describes the file called `name` in the given state.
    pub fn new(name: impl Into<String>, state: FileState) -> Self {
        let name = name.into();
        let extension = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let inferred_type = FeedType::infer(&name);
        Self {
            name,
            extension,
            inferred_type,
            state,
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        &self.name[..self.name.len() - self.extension.len()]
    }

    /// Returns the same file tagged with a later state.
    pub fn advance(mut self, state: FileState) -> Self {
        self.state = state;
        self
    }
}

/// The normalized unit of the merged dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    /// Domain name
    pub domain: String,
    /// Malware family label, `"NA"` for ranking feed records
    pub malware: String,
    /// 1 for DGA feed records, 0 otherwise
    pub dga: u8,
    /// Ingestion batch date
    pub date: NaiveDate,
}

impl DomainRecord {
    /// A ranking feed record (`malware = "NA"`, `dga = 0`).
    pub fn ranking(domain: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            domain: domain.into(),
            malware: NO_MALWARE_LABEL.to_string(),
            dga: 0,
            date,
        }
    }

    /// A DGA feed record (`dga = 1`).
    pub fn dga(domain: impl Into<String>, malware: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            domain: domain.into(),
            malware: malware.into(),
            dga: 1,
            date,
        }
    }

    /// Approximate bytes held by this record, inline and on the heap.
    pub fn footprint(&self) -> usize {
        std::mem::size_of::<Self>() + self.domain.capacity() + self.malware.capacity()
    }
}

/// Synthetic journal phases written in place of a file's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// One batch appended to the dataset
    Merge,
    /// Deduplication pass
    Dedup,
    /// Malware family aggregation
    Count,
}

/// One line of the processing journal.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingLogEntry {
    /// When the entry was written
    pub run_timestamp: DateTime<Utc>,
    /// Source file name, empty for phase entries
    pub source: String,
    /// Record date (`YYYY-MM-DD`) or phase tag
    pub label: String,
    /// Wall-clock seconds spent
    pub elapsed_seconds: f64,
    /// In-memory size of the result in megabytes
    pub memory_megabytes: f64,
}

impl ProcessingLogEntry {
    /// Entry for a parsed feed file.
    pub fn for_file(
        source: impl Into<String>,
        date: NaiveDate,
        elapsed_seconds: f64,
        memory_megabytes: f64,
    ) -> Self {
        Self {
            run_timestamp: Utc::now(),
            source: source.into(),
            label: date.format(crate::config::DATE_TOKEN_FORMAT).to_string(),
            elapsed_seconds,
            memory_megabytes,
        }
    }

    /// Entry for a merge, dedup or count phase.
    pub fn for_phase(phase: Phase, elapsed_seconds: f64, memory_megabytes: f64) -> Self {
        Self {
            run_timestamp: Utc::now(),
            source: String::new(),
            label: phase.as_ref().to_string(),
            elapsed_seconds,
            memory_megabytes,
        }
    }

    /// The phase this entry records, if it is a synthetic entry.
    pub fn phase(&self) -> Option<Phase> {
        if self.source.is_empty() {
            self.label.parse().ok()
        } else {
            None
        }
    }
}

/// Number of distinct domains carrying one malware label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalwareFamilyCount {
    /// Malware family label (`"NA"` for ranking records)
    pub label: String,
    /// Distinct domains with that label
    pub domains: usize,
}
