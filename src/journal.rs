//! Processing journal (`data_prep_log.log`).
//!
//! Append-only, one comma-separated line per [`ProcessingLogEntry`]:
//!
//! ```text
//! 2020-01-05-13:37, top-1m-2020-01-05.csv, 2020-01-05, 1.234, 56.78
//! 2020-01-05-13:37, , merge, 0.010, 56.80
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, TimeZone, Utc};
use log::info;

use crate::config::{JOURNAL_FILE_NAME, JOURNAL_TIMESTAMP_FORMAT};
use crate::error_handling::PipelineError;
use crate::models::ProcessingLogEntry;

/// Path of the journal inside `dir`.
pub fn journal_path(dir: &Path) -> PathBuf {
    dir.join(JOURNAL_FILE_NAME)
}

/// Renders one journal line (without newline).
pub fn format_line(entry: &ProcessingLogEntry) -> String {
    format!(
        "{}, {}, {}, {:.3}, {:.2}",
        entry.run_timestamp.format(JOURNAL_TIMESTAMP_FORMAT),
        entry.source,
        entry.label,
        entry.elapsed_seconds,
        entry.memory_megabytes
    )
}

/// Parses a journal line back into an entry; `None` if it is not one.
pub fn parse_line(line: &str) -> Option<ProcessingLogEntry> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [timestamp, source, label, elapsed, memory] = fields.as_slice() else {
        return None;
    };

    let naive = NaiveDateTime::parse_from_str(timestamp, JOURNAL_TIMESTAMP_FORMAT).ok()?;
    Some(ProcessingLogEntry {
        run_timestamp: Utc.from_utc_datetime(&naive),
        source: source.to_string(),
        label: label.to_string(),
        elapsed_seconds: elapsed.parse().ok()?,
        memory_megabytes: memory.parse().ok()?,
    })
}

/// Appends `entries` to the journal in `dir`, creating it if absent.
///
/// Each entry is also logged at info level.
pub fn append_entries(dir: &Path, entries: &[ProcessingLogEntry]) -> Result<(), PipelineError> {
    let path = journal_path(dir);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| PipelineError::io(&path, e))?;

    for entry in entries {
        let line = format_line(entry);
        info!("journal: {}", line);
        writeln!(file, "{}", line).map_err(|e| PipelineError::io(&path, e))?;
    }
    Ok(())
}

/// Reads every well-formed entry from the journal in `dir`.
///
/// A missing journal reads as empty.
pub fn read_journal(dir: &Path) -> Result<Vec<ProcessingLogEntry>, PipelineError> {
    let path = journal_path(dir);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PipelineError::io(&path, e)),
    };
    Ok(content.lines().filter_map(parse_line).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phase;
    use chrono::{NaiveDate, Timelike};
    use tempfile::TempDir;

    fn entry_at(source: &str, label: &str) -> ProcessingLogEntry {
        ProcessingLogEntry {
            run_timestamp: Utc.with_ymd_and_hms(2020, 1, 5, 13, 37, 0).unwrap(),
            source: source.to_string(),
            label: label.to_string(),
            elapsed_seconds: 1.23456,
            memory_megabytes: 56.789,
        }
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line(&entry_at("top-1m-2020-01-05.csv", "2020-01-05")),
            "2020-01-05-13:37, top-1m-2020-01-05.csv, 2020-01-05, 1.235, 56.79"
        );
        assert_eq!(
            format_line(&entry_at("", "merge")),
            "2020-01-05-13:37, , merge, 1.235, 56.79"
        );
    }

    #[test]
    fn test_parse_line() {
        let parsed = parse_line("2020-01-05-13:37, , dedup, 0.500, 2.00").unwrap();
        assert_eq!(parsed.phase(), Some(Phase::Dedup));
        assert_eq!(parsed.run_timestamp.hour(), 13);
        assert_eq!(parsed.elapsed_seconds, 0.5);

        assert!(parse_line("").is_none());
        assert!(parse_line("garbage, line").is_none());
        assert!(parse_line("2020-01-05, a, b, 1, 2").is_none());
    }

    #[test]
    fn test_append_never_truncates() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let date = NaiveDate::from_ymd_opt(2020, 1, 5).unwrap();

        append_entries(
            dir.path(),
            &[ProcessingLogEntry::for_file("dga-2020-01-05.csv", date, 0.1, 1.0)],
        )
        .unwrap();
        append_entries(dir.path(), &[ProcessingLogEntry::for_phase(Phase::Count, 0.2, 1.5)])
            .unwrap();

        let replayed = read_journal(dir.path()).unwrap();
        assert_eq!(replayed.len(), 2);
        assert_eq!(replayed[0].source, "dga-2020-01-05.csv");
        assert_eq!(replayed[0].label, "2020-01-05");
        assert_eq!(replayed[1].phase(), Some(Phase::Count));
        assert_eq!(replayed[1].memory_megabytes, 1.5);
    }

    #[test]
    fn test_read_missing_journal() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        assert!(read_journal(dir.path()).unwrap().is_empty());
    }
}
