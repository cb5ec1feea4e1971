//! DGA feed parser.
//!
//! Layout: a fixed 16-line preamble, then `domain,description,date[,...]`
//! rows. The description is reduced to a malware family token and every record
//! is dated with the file's ingestion date; the per-row date column is read
//! but not used.

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use log::debug;
use regex::Regex;

use crate::config::{DGA_MALWARE_PREFIX, DGA_PREAMBLE_LINES};
use crate::error_handling::PipelineError;
use crate::models::DomainRecord;
use crate::utils::compile_regex_unsafe;

static FAMILY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"^\s*(\S+)", "FAMILY_RE"));

/// Reduces a free-text description to its malware family label.
///
/// `"Domain used by Zeus to do bad things"` becomes `"zeus"`. A description
/// without the `"Domain used by "` prefix, or with nothing after it, yields
/// an empty label.
pub fn malware_family(description: &str) -> String {
    let Some(rest) = description.strip_prefix(DGA_MALWARE_PREFIX) else {
        return String::new();
    };
    FAMILY_RE
        .captures(rest)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase().trim().to_string())
        .unwrap_or_default()
}

/// Returns `bytes` without its first `lines` lines.
fn skip_lines(bytes: &[u8], lines: usize) -> &[u8] {
    if lines == 0 {
        return bytes;
    }
    match bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .nth(lines - 1)
    {
        Some((idx, _)) => &bytes[idx + 1..],
        None => &[],
    }
}

/// Reads a DGA feed, dating every record with `date`.
pub(crate) fn read_dga_feed(
    path: &Path,
    date: NaiveDate,
) -> Result<Vec<DomainRecord>, PipelineError> {
    let feed_err = |source| PipelineError::FeedRead {
        path: path.to_path_buf(),
        source,
    };

    let bytes = std::fs::read(path).map_err(|e| PipelineError::io(path, e))?;
    let body = skip_lines(&bytes, DGA_PREAMBLE_LINES);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(body);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut row_dates = 0usize;
    for row in reader.records() {
        let row = row.map_err(feed_err)?;
        let domain = row.get(0).unwrap_or_default();
        if domain.is_empty() {
            skipped += 1;
            continue;
        }
        if row.get(2).is_some_and(|d| !d.is_empty()) {
            row_dates += 1;
        }
        let family = malware_family(row.get(1).unwrap_or_default());
        records.push(DomainRecord::dga(domain, family, date));
    }

    debug!(
        "DGA feed {}: {} record(s), {} skipped, {} per-row date(s) replaced by {}",
        path.display(),
        records.len(),
        skipped,
        row_dates,
        date
    );
    Ok(records)
}
