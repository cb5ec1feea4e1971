//! Analysis of an existing merged dataset file.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use log::info;
use serde::Deserialize;

use crate::config::DATE_TOKEN_FORMAT;
use crate::error_handling::PipelineError;
use crate::merge::malware_family_counts;
use crate::models::{DomainRecord, MalwareFamilyCount};
use crate::utils::timed;

#[derive(Debug, Deserialize)]
struct MergedRow {
    domain: String,
    malware: String,
    dga: u8,
    date: String,
}

/// Summary of a merged dataset file.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Rows in the file
    pub records: usize,
    /// Rows whose domain already appeared earlier in the file
    pub duplicate_domains: usize,
    /// Distinct domains per malware label, count descending
    pub counts: Vec<MalwareFamilyCount>,
    /// Seconds spent aggregating
    pub count_seconds: f64,
}

/// Reads a `domain,malware,dga,date` file and recomputes the family counts.
///
/// # Errors
///
/// Returns `FeedRead` for unreadable or malformed rows and
/// `MalformedDateToken` for dates that are not `YYYY-MM-DD`.
pub fn analyze_merged(path: &Path) -> Result<AnalysisReport, PipelineError> {
    let feed_err = |source| PipelineError::FeedRead {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(feed_err)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<MergedRow>() {
        let row = row.map_err(feed_err)?;
        let date = NaiveDate::parse_from_str(&row.date, DATE_TOKEN_FORMAT).map_err(|_| {
            PipelineError::MalformedDateToken {
                name: path.display().to_string(),
                token: row.date.clone(),
            }
        })?;
        records.push(DomainRecord {
            domain: row.domain,
            malware: row.malware,
            dga: row.dga,
            date,
        });
    }

    let distinct: HashSet<&str> = records.iter().map(|r| r.domain.as_str()).collect();
    let duplicate_domains = records.len() - distinct.len();
    let (counts, count_seconds) = timed(|| malware_family_counts(&records));

    info!(
        "Analyzed {}: {} record(s), {} duplicate domain(s), {} label(s) in {:.3}s",
        path.display(),
        records.len(),
        duplicate_domains,
        counts.len(),
        count_seconds
    );

    Ok(AnalysisReport {
        records: records.len(),
        duplicate_domains,
        counts,
        count_seconds,
    })
}
