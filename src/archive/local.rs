//! Local directory mirror of the archive.

use std::path::{Path, PathBuf};

use log::debug;

use crate::archive::BlobArchive;
use crate::error_handling::PipelineError;

/// Stores objects as files under `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalArchive {
    root: PathBuf,
}

impl LocalArchive {
    /// Mirror rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where `key` in `bucket` is stored.
    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        key.split('/')
            .fold(self.root.join(bucket), |path, segment| path.join(segment))
    }
}

impl BlobArchive for LocalArchive {
    async fn upload(&self, bucket: &str, source: &Path, key: &str) -> Result<(), PipelineError> {
        let dest = self.object_path(bucket, key);
        let upload_err = |reason: std::io::Error| PipelineError::ArchiveUpload {
            path: source.to_path_buf(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(upload_err)?;
        }
        tokio::fs::copy(source, &dest).await.map_err(upload_err)?;
        debug!("Copied {} to {}", source.display(), dest.display());
        Ok(())
    }
}
