//! Ingestion date tokens in file names.
//!
//! Every file entering the processing directory carries exactly one
//! `YYYY-MM-DD` token. Records take their date from it and the archive key is
//! partitioned by it.

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use log::{debug, info};
use regex::Regex;

use crate::config::{Config, DATE_TOKEN_FORMAT, DATE_TOKEN_PATTERN};
use crate::error_handling::PipelineError;
use crate::models::{FileState, SourceFile};
use crate::utils::{compile_regex_unsafe, list_files};

static DATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(DATE_TOKEN_PATTERN, "DATE_TOKEN_RE"));

/// Returns the first date token in `text`, if any.
pub fn find_date_token(text: &str) -> Option<&str> {
    DATE_TOKEN_RE.find(text).map(|m| m.as_str())
}

/// Parses the ingestion date embedded in a file name.
///
/// # Errors
///
/// - `MissingDateToken` if the name has no `YYYY-MM-DD` token
/// - `MalformedDateToken` if the token is not a calendar date (e.g. `2020-13-40`)
pub fn file_date(file_name: &str) -> Result<NaiveDate, PipelineError> {
    let token = find_date_token(file_name)
        .ok_or_else(|| PipelineError::MissingDateToken(file_name.to_string()))?;
    NaiveDate::parse_from_str(token, DATE_TOKEN_FORMAT).map_err(|_| {
        PipelineError::MalformedDateToken {
            name: file_name.to_string(),
            token: token.to_string(),
        }
    })
}

/// Name the file gets when stamped with `date`: `<stem>-<date><ext>`.
pub fn stamped_name(file: &SourceFile, date: NaiveDate) -> String {
    format!(
        "{}-{}{}",
        file.stem(),
        date.format(DATE_TOKEN_FORMAT),
        file.extension
    )
}

/// Appends `date` to every non-excluded file in `dir` whose stem has no date token.
///
/// Files that already carry a token are left untouched, so running twice is a
/// no-op. Returns every considered file, tagged `Datestamped`, under its final name.
pub fn stamp_directory(
    dir: &Path,
    date: NaiveDate,
    config: &Config,
) -> Result<Vec<SourceFile>, PipelineError> {
    let mut stamped = Vec::new();
    let mut renamed = 0usize;

    for name in list_files(dir)? {
        if config.is_excluded(&name) {
            debug!("Skipping excluded file {}", name);
            continue;
        }

        let file = SourceFile::new(name, FileState::Datestamped);
        if find_date_token(file.stem()).is_some() {
            stamped.push(file);
            continue;
        }

        let new_name = stamped_name(&file, date);
        let from = dir.join(&file.name);
        let to = dir.join(&new_name);
        std::fs::rename(&from, &to).map_err(|e| PipelineError::io(&from, e))?;
        info!("Datestamped {} -> {}", file.name, new_name);
        renamed += 1;
        stamped.push(SourceFile::new(new_name, FileState::Datestamped));
    }

    info!(
        "Datestamp stage: {} file(s) considered, {} renamed",
        stamped.len(),
        renamed
    );
    Ok(stamped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_file_date_parses_token() {
        assert_eq!(file_date("dga-feed-2020-05-01.csv").unwrap(), date(2020, 5, 1));
        assert_eq!(file_date("top-1m-2019-12-31.csv").unwrap(), date(2019, 12, 31));
    }

    #[test]
    fn test_file_date_missing_token() {
        let err = file_date("top-1m.csv").unwrap_err();
        assert!(matches!(err, PipelineError::MissingDateToken(ref n) if n == "top-1m.csv"));
    }

    #[test]
    fn test_file_date_malformed_token() {
        let err = file_date("dga-2020-13-45.csv").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedDateToken { ref token, .. } if token == "2020-13-45"
        ));
    }

    #[test]
    fn test_stamped_name_keeps_extension() {
        let file = SourceFile::new("top-1m.csv", FileState::Extracted);
        assert_eq!(stamped_name(&file, date(2020, 1, 2)), "top-1m-2020-01-02.csv");

        let bare = SourceFile::new("README", FileState::Extracted);
        assert_eq!(stamped_name(&bare, date(2020, 1, 2)), "README-2020-01-02");
    }

    #[test]
    fn test_stamp_directory_renames_and_is_idempotent() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("top-1m.csv"), "1,example.com\n").unwrap();
        fs::write(dir.path().join("dga-feed-2020-01-01.csv"), "x").unwrap();
        fs::write(dir.path().join(".DS_Store"), "").unwrap();
        let config = Config::default();
        let today = date(2021, 3, 4);

        let first = stamp_directory(dir.path(), today, &config).unwrap();
        let names: Vec<_> = first.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["dga-feed-2020-01-01.csv", "top-1m-2021-03-04.csv"]);
        assert!(first.iter().all(|f| f.state == FileState::Datestamped));
        assert!(dir.path().join("top-1m-2021-03-04.csv").exists());
        assert!(dir.path().join(".DS_Store").exists());

        let second = stamp_directory(dir.path(), date(2021, 3, 5), &config).unwrap();
        assert_eq!(first, second);
        let mut on_disk = list_files(dir.path()).unwrap();
        on_disk.sort();
        assert_eq!(
            on_disk,
            vec![".DS_Store", "dga-feed-2020-01-01.csv", "top-1m-2021-03-04.csv"]
        );
    }
}
