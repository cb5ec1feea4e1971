//! Feed download.
//!
//! Sources are fetched one at a time in configured order. Anything other than
//! `200 OK` aborts the run; there are no retries.

use std::path::Path;

use log::{debug, info};

use crate::config::{FeedSource, HTTP_SUCCESS};
use crate::error_handling::PipelineError;
use crate::models::{FileState, SourceFile};
use crate::utils::ensure_dir;

/// Downloads one source into `download_dir`, returning the written file.
pub async fn fetch_source(
    client: &reqwest::Client,
    source: &FeedSource,
    download_dir: &Path,
) -> Result<SourceFile, PipelineError> {
    let file_name = source.expected_filename()?;
    debug!("Fetching {} as {}", source.url, file_name);

    let request_err = |e| PipelineError::HttpRequest {
        url: source.url.clone(),
        source: e,
    };

    let response = client.get(&source.url).send().await.map_err(request_err)?;
    let status = response.status().as_u16();
    if status != HTTP_SUCCESS {
        return Err(PipelineError::HttpStatus {
            url: source.url.clone(),
            status,
        });
    }

    let body = response.bytes().await.map_err(request_err)?;
    let path = download_dir.join(&file_name);
    tokio::fs::write(&path, &body)
        .await
        .map_err(|e| PipelineError::io(&path, e))?;

    info!("Fetched {} ({} bytes) to {}", source.url, body.len(), path.display());
    Ok(SourceFile::new(file_name, FileState::Fetched))
}

/// Downloads every source in order, creating `download_dir` if needed.
///
/// Stops at the first failure; files already written stay on disk.
pub async fn fetch_sources(
    client: &reqwest::Client,
    sources: &[FeedSource],
    download_dir: &Path,
) -> Result<Vec<SourceFile>, PipelineError> {
    ensure_dir(download_dir)?;

    let mut fetched = Vec::with_capacity(sources.len());
    for source in sources {
        fetched.push(fetch_source(client, source, download_dir).await?);
    }
    Ok(fetched)
}
