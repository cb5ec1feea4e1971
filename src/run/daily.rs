use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::info;

use crate::archive::{archive_directory, ArchivedObject, BlobArchive};
use crate::config::Config;
use crate::datestamp::stamp_directory;
use crate::extract::extract_archives;
use crate::fetch::fetch_sources;
use crate::models::SourceFile;

/// Outcome of a daily run.
#[derive(Debug, Clone)]
pub struct DailyReport {
    /// Date stamped onto undated files
    pub run_date: NaiveDate,
    /// Files written by the fetcher
    pub fetched: Vec<SourceFile>,
    /// Files unpacked from archives
    pub extracted: Vec<SourceFile>,
    /// Every file in the download directory after datestamping
    pub stamped: Vec<SourceFile>,
    /// Files handed to the archive
    pub archived: Vec<ArchivedObject>,
}

/// Runs the daily pipeline for today's UTC date.
pub async fn run_daily<A: BlobArchive>(
    config: &Config,
    client: &reqwest::Client,
    archive: &A,
) -> Result<DailyReport> {
    run_daily_for_date(config, client, archive, Utc::now().date_naive()).await
}

/// Runs the daily pipeline, stamping undated files with `run_date`.
///
/// # Errors
///
/// Any non-200 download, corrupt archive, undated archive candidate or failed
/// upload aborts the run.
pub async fn run_daily_for_date<A: BlobArchive>(
    config: &Config,
    client: &reqwest::Client,
    archive: &A,
    run_date: NaiveDate,
) -> Result<DailyReport> {
    let downloads = config.downloads_dir.as_path();
    info!(
        "Daily run {} over {} ({} source(s))",
        run_date,
        downloads.display(),
        config.sources.len()
    );

    let fetched = fetch_sources(client, &config.sources, downloads)
        .await
        .context("Failed to fetch feeds")?;
    let extracted = extract_archives(downloads).context("Failed to extract archives")?;
    let stamped =
        stamp_directory(downloads, run_date, config).context("Failed to datestamp downloads")?;
    let archived = archive_directory(downloads, config, archive)
        .await
        .context("Failed to archive downloads")?;

    info!(
        "Daily run complete: {} fetched, {} extracted, {} archived",
        fetched.len(),
        extracted.len(),
        archived.len()
    );

    Ok(DailyReport {
        run_date,
        fetched,
        extracted,
        stamped,
        archived,
    })
}
