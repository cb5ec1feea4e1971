//! Ranking (popular domains) feed parser.
//!
//! The file is a headerless `rank,domain` table; only the domain is kept.

use std::path::Path;

use chrono::NaiveDate;
use log::debug;

use crate::error_handling::PipelineError;
use crate::models::DomainRecord;

/// Reads a ranking feed, dating every record with `date`.
pub(crate) fn read_ranking_feed(
    path: &Path,
    date: NaiveDate,
) -> Result<Vec<DomainRecord>, PipelineError> {
    let feed_err = |source| PipelineError::FeedRead {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(feed_err)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row.map_err(feed_err)?;
        match row.get(1) {
            Some(domain) if !domain.is_empty() => {
                records.push(DomainRecord::ranking(domain, date));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(
            "Skipped {} ranking row(s) without a domain in {}",
            skipped,
            path.display()
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_ranking_feed_keeps_domain_column() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("top-1m-2020-01-01.csv");
        fs::write(&path, "1,example.com\n2,foo.net\n\n3,\n4\n").unwrap();
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        let records = read_ranking_feed(&path, date).unwrap();
        assert_eq!(
            records,
            vec![
                DomainRecord::ranking("example.com", date),
                DomainRecord::ranking("foo.net", date),
            ]
        );
    }

    #[test]
    fn test_read_ranking_feed_missing_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let result = read_ranking_feed(&dir.path().join("top-missing.csv"), date);
        assert!(matches!(result, Err(PipelineError::FeedRead { .. })));
    }
}
