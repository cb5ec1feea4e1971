use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::{debug, info};

use crate::config::{Config, JOURNAL_FILE_NAME, MERGED_FILE_PREFIX};
use crate::journal::append_entries;
use crate::merge::{merged_file_name, MergedDataset};
use crate::models::{FileState, MalwareFamilyCount, ProcessingLogEntry, SourceFile};
use crate::parse::parse_source_file;
use crate::stage::stage_files;
use crate::utils::list_files;

/// Outcome of a merge run.
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Files moved from the download directory
    pub staged: Vec<SourceFile>,
    /// Files normalized into the dataset, tagged `Parsed`
    pub parsed: Vec<SourceFile>,
    /// Files skipped because their feed type is unknown
    pub skipped: Vec<SourceFile>,
    /// Records before deduplication
    pub records_before_dedup: usize,
    /// Records written to the merged file
    pub records: usize,
    /// Merged dataset location
    pub merged_path: PathBuf,
    /// Distinct domains per malware label, count descending
    pub counts: Vec<MalwareFamilyCount>,
    /// Journal entries written by this run, in order
    pub entries: Vec<ProcessingLogEntry>,
}

/// Runs the merge pipeline, naming the output after today's UTC date.
pub fn run_merge(config: &Config) -> Result<MergeReport> {
    run_merge_for_date(config, Utc::now().date_naive())
}

/// Output files of earlier runs that live beside the staged feeds.
fn is_pipeline_output(name: &str) -> bool {
    name == JOURNAL_FILE_NAME || (name.starts_with(MERGED_FILE_PREFIX) && name.ends_with(".csv"))
}

/// Runs the merge pipeline, writing `merged-<run_date>.csv`.
///
/// Every feed file in the processing directory is parsed, including files
/// staged by earlier runs. Journal entries are appended as each step finishes.
///
/// # Errors
///
/// Staging failures, unreadable feeds, undated feed names and write failures
/// abort the run.
pub fn run_merge_for_date(config: &Config, run_date: NaiveDate) -> Result<MergeReport> {
    let processing = config.processing_dir.as_path();
    let staged = stage_files(&config.downloads_dir, processing, config)
        .context("Failed to stage downloads")?;

    let mut dataset = MergedDataset::new();
    let mut parsed = Vec::new();
    let mut skipped = Vec::new();
    let mut entries = Vec::new();
    let mut journal = |entry: ProcessingLogEntry| -> Result<()> {
        append_entries(processing, std::slice::from_ref(&entry))
            .context("Failed to append to processing journal")?;
        entries.push(entry);
        Ok(())
    };

    let names = list_files(processing).context("Failed to list processing directory")?;
    for name in names {
        if config.is_excluded(&name) || is_pipeline_output(&name) {
            debug!("Not a feed file, skipping {}", name);
            continue;
        }

        let file = SourceFile::new(name, FileState::Staged);
        let Some(batch) = parse_source_file(processing, &file)
            .with_context(|| format!("Failed to parse {}", file.name))?
        else {
            skipped.push(file);
            continue;
        };
        journal(batch.entry)?;
        journal(dataset.append(batch.records))?;
        parsed.push(batch.file);
    }

    let records_before_dedup = dataset.len();
    journal(dataset.deduplicate())?;
    let (counts, count_entry) = dataset.malware_counts();
    journal(count_entry)?;

    let merged_path = processing.join(merged_file_name(run_date));
    dataset
        .write_csv(&merged_path)
        .context("Failed to write merged dataset")?;

    info!(
        "Merge run complete: {} file(s) parsed, {} skipped, {} -> {} record(s)",
        parsed.len(),
        skipped.len(),
        records_before_dedup,
        dataset.len()
    );

    Ok(MergeReport {
        staged,
        parsed,
        skipped,
        records_before_dedup,
        records: dataset.len(),
        merged_path,
        counts,
        entries,
    })
}
