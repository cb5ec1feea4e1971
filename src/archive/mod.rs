//! Archive hand-off for raw feed files.
//!
//! This module provides:
//! - Archive key construction from the file prefix map and ingestion date
//! - The [`BlobArchive`] collaborator trait
//! - A local directory mirror and an HTTP object-store uploader
//!
//! Objects are overwritten when the key already exists. Nothing is retried.

mod http;
mod key;
mod local;

use std::future::Future;
use std::path::Path;

use log::{debug, info};

use crate::config::{ArchiveBackend, ArchiveSettings, Config};
use crate::datestamp::file_date;
use crate::error_handling::{InitializationError, PipelineError};
use crate::models::{FileState, SourceFile};
use crate::utils::list_files;

pub use http::HttpArchive;
pub use key::archive_key;
pub use local::LocalArchive;

/// Persists bytes under a key in a bucket.
pub trait BlobArchive {
    /// Stores the contents of `source` as `key` in `bucket`.
    fn upload(
        &self,
        bucket: &str,
        source: &Path,
        key: &str,
    ) -> impl Future<Output = Result<(), PipelineError>> + Send;
}

/// Archive backend selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredArchive {
    /// Local directory mirror
    Local(LocalArchive),
    /// HTTP object store
    Http(HttpArchive),
}

impl ConfiguredArchive {
    /// Builds the backend described by `settings`.
    ///
    /// The bearer token is resolved here, from `token` or else `token_file`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::ConfigError` if the token file cannot be
    /// read or the endpoint is not a valid URL.
    pub fn from_settings(
        settings: &ArchiveSettings,
        client: reqwest::Client,
    ) -> Result<Self, InitializationError> {
        match &settings.backend {
            ArchiveBackend::Local { root } => Ok(Self::Local(LocalArchive::new(root.clone()))),
            ArchiveBackend::Http {
                endpoint,
                token,
                token_file,
            } => {
                let token = match (token, token_file) {
                    (Some(token), _) => Some(token.clone()),
                    (None, Some(path)) => {
                        let raw = std::fs::read_to_string(path).map_err(|e| {
                            InitializationError::ConfigError(format!(
                                "Failed to read archive token file {}: {}",
                                path.display(),
                                e
                            ))
                        })?;
                        Some(raw.trim().to_string())
                    }
                    (None, None) => None,
                };
                let archive = HttpArchive::new(client, endpoint, token)
                    .map_err(|e| InitializationError::ConfigError(e.to_string()))?;
                Ok(Self::Http(archive))
            }
        }
    }
}

impl BlobArchive for ConfiguredArchive {
    async fn upload(&self, bucket: &str, source: &Path, key: &str) -> Result<(), PipelineError> {
        match self {
            Self::Local(archive) => archive.upload(bucket, source, key).await,
            Self::Http(archive) => archive.upload(bucket, source, key).await,
        }
    }
}

/// A file handed to the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedObject {
    /// The archived file
    pub file: SourceFile,
    /// Destination key in the bucket
    pub key: String,
}

/// Archives every eligible file in `dir`.
///
/// Eligible: not excluded and with an extension listed in `data_formats`.
///
/// # Errors
///
/// A missing or malformed date token on an eligible file is fatal, as is any
/// upload failure.
pub async fn archive_directory<A: BlobArchive>(
    dir: &Path,
    config: &Config,
    archive: &A,
) -> Result<Vec<ArchivedObject>, PipelineError> {
    let mut archived = Vec::new();

    for name in list_files(dir)? {
        if config.is_excluded(&name) {
            debug!("Skipping excluded file {}", name);
            continue;
        }
        let file = SourceFile::new(name, FileState::Datestamped);
        if !config.data_formats.contains(&file.extension) {
            debug!("Skipping {}: extension not approved for archival", file.name);
            continue;
        }

        let date = file_date(&file.name)?;
        let key = archive_key(&file.name, date, &config.file_map);
        archive
            .upload(&config.archive.bucket, &dir.join(&file.name), &key)
            .await?;
        info!("Archived {} to {}/{}", file.name, config.archive.bucket, key);
        archived.push(ArchivedObject { file, key });
    }

    Ok(archived)
}
