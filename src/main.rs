//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `feed_pipeline` library that handles:
//! - Command-line argument parsing
//! - Configuration loading
//! - Logger initialization
//! - User-facing output formatting

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use feed_pipeline::cli::{Cli, Command};
use feed_pipeline::initialization::{init_archive, init_client, init_logger_with};
use feed_pipeline::{
    analyze_merged, run_daily, run_merge, Config, MalwareFamilyCount, PipelineError,
};

fn print_counts(counts: &[MalwareFamilyCount]) {
    let width = counts
        .iter()
        .map(|c| c.label.len())
        .max()
        .unwrap_or(0)
        .max("malware".len());
    println!("{:<width$}  domains", "malware", width = width);
    for count in counts {
        println!("{:<width$}  {}", count.label, count.domains, width = width);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Command::Daily => {
            let client = init_client(&config).context("Failed to initialize HTTP client")?;
            let archive =
                init_archive(&config, &client).context("Failed to initialize archive backend")?;
            let report = run_daily(&config, &client, &archive).await?;
            println!(
                "Fetched {} feed(s), extracted {} file(s), archived {} file(s) for {}",
                report.fetched.len(),
                report.extracted.len(),
                report.archived.len(),
                report.run_date
            );
        }
        Command::Merge => {
            let report = run_merge(&config)?;
            println!(
                "Merged {} file(s): {} record(s) after deduplication ({} before)",
                report.parsed.len(),
                report.records,
                report.records_before_dedup
            );
            println!("Results saved in {}", report.merged_path.display());
            print_counts(&report.counts);
        }
        Command::Analyze { file } => {
            let report = analyze_merged(&file)
                .with_context(|| format!("Failed to analyze {}", file.display()))?;
            println!(
                "{} record(s), {} duplicate domain(s), counted in {:.3}s",
                report.records, report.duplicate_domains, report.count_seconds
            );
            print_counts(&report.counts);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<PipelineError>() {
            Some(stage_err) => eprintln!(
                "feed_pipeline error [{}]: {:#}",
                stage_err.stage().as_ref(),
                e
            ),
            None => eprintln!("feed_pipeline error: {:#}", e),
        }
        process::exit(1);
    }
    Ok(())
}
