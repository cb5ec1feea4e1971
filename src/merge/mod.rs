//! Merged dataset: accumulation, deduplication, aggregation and output.
//!
//! Each operation returns the journal entry describing it so the caller decides
//! when entries are written.

mod counts;
mod dedup;

use std::path::Path;

use chrono::NaiveDate;
use log::info;

use crate::config::{DATE_TOKEN_FORMAT, MERGED_FILE_PREFIX, MERGED_HEADER};
use crate::error_handling::PipelineError;
use crate::models::{DomainRecord, MalwareFamilyCount, Phase, ProcessingLogEntry};
use crate::utils::{records_megabytes, timed};

pub use counts::malware_family_counts;
pub use dedup::deduplicate_records;

/// File name of the merged dataset written on `date`.
pub fn merged_file_name(date: NaiveDate) -> String {
    format!("{}{}.csv", MERGED_FILE_PREFIX, date.format(DATE_TOKEN_FORMAT))
}

/// Records accumulated across every parsed batch of a merge run.
#[derive(Debug, Default)]
pub struct MergedDataset {
    records: Vec<DomainRecord>,
}

impl MergedDataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in their current order.
    pub fn records(&self) -> &[DomainRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends one parsed batch; the entry measures the accumulated dataset.
    pub fn append(&mut self, batch: Vec<DomainRecord>) -> ProcessingLogEntry {
        let added = batch.len();
        let ((), elapsed) = timed(|| self.records.extend(batch));
        info!("Merged {} record(s), dataset now {}", added, self.records.len());
        ProcessingLogEntry::for_phase(Phase::Merge, elapsed, records_megabytes(&self.records))
    }

    /// Keeps one record per domain (latest date wins), in append order.
    pub fn deduplicate(&mut self) -> ProcessingLogEntry {
        let before = self.records.len();
        let records = std::mem::take(&mut self.records);
        let (deduped, elapsed) = timed(|| deduplicate_records(records));
        self.records = deduped;
        info!(
            "Deduplicated {} record(s) down to {}",
            before,
            self.records.len()
        );
        ProcessingLogEntry::for_phase(Phase::Dedup, elapsed, records_megabytes(&self.records))
    }

    /// Distinct domains per malware label, count descending.
    pub fn malware_counts(&self) -> (Vec<MalwareFamilyCount>, ProcessingLogEntry) {
        let (counts, elapsed) = timed(|| malware_family_counts(&self.records));
        let entry =
            ProcessingLogEntry::for_phase(Phase::Count, elapsed, records_megabytes(&self.records));
        (counts, entry)
    }

    /// Writes the dataset as `domain,malware,dga,date`, replacing any existing file.
    pub fn write_csv(&self, path: &Path) -> Result<(), PipelineError> {
        let table_err = |source| PipelineError::TableWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(table_err)?;
        writer.write_record(MERGED_HEADER).map_err(table_err)?;
        for record in &self.records {
            let dga = record.dga.to_string();
            let date = record.date.format(DATE_TOKEN_FORMAT).to_string();
            writer
                .write_record([
                    record.domain.as_str(),
                    record.malware.as_str(),
                    dga.as_str(),
                    date.as_str(),
                ])
                .map_err(table_err)?;
        }
        writer.flush().map_err(|e| PipelineError::io(path, e))?;

        info!(
            "Wrote {} merged record(s) to {}",
            self.records.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    #[test]
    fn test_merged_file_name() {
        assert_eq!(merged_file_name(day(5)), "merged-2020-01-05.csv");
    }

    #[test]
    fn test_append_dedup_count_entries() {
        let mut dataset = MergedDataset::new();
        let merge = dataset.append(vec![
            DomainRecord::ranking("example.com", day(1)),
            DomainRecord::dga("evil.tv", "zeus", day(1)),
        ]);
        dataset.append(vec![DomainRecord::dga("evil.tv", "tinba", day(5))]);
        assert_eq!(merge.phase(), Some(Phase::Merge));
        assert_eq!(dataset.len(), 3);

        let dedup = dataset.deduplicate();
        assert_eq!(dedup.phase(), Some(Phase::Dedup));
        assert_eq!(
            dataset.records(),
            &[
                DomainRecord::ranking("example.com", day(1)),
                DomainRecord::dga("evil.tv", "tinba", day(5)),
            ]
        );

        let (counts, count) = dataset.malware_counts();
        assert_eq!(count.phase(), Some(Phase::Count));
        assert_eq!(counts.len(), 2);
        assert!(counts.iter().all(|c| c.domains == 1));
    }

    #[test]
    fn test_write_csv_layout() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("merged-2020-01-05.csv");
        fs::write(&path, "stale contents\n").unwrap();

        let mut dataset = MergedDataset::new();
        dataset.append(vec![
            DomainRecord::ranking("example.com", day(1)),
            DomainRecord::dga("badsite.cn", "zeus", day(5)),
        ]);
        dataset.write_csv(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "domain,malware,dga,date\n\
             example.com,NA,0,2020-01-01\n\
             badsite.cn,zeus,1,2020-01-05\n"
        );
    }

    #[test]
    fn test_write_csv_empty_dataset_has_header() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("merged.csv");
        MergedDataset::new().write_csv(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "domain,malware,dga,date\n");
    }
}
