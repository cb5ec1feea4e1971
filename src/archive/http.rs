//! Object-store upload over HTTP.
//!
//! Speaks the media-upload endpoint of the GCS JSON API:
//! `POST {endpoint}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={key}`.

use std::path::Path;

use log::debug;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::archive::BlobArchive;
use crate::error_handling::PipelineError;

/// Uploads objects to an HTTP object store with an optional bearer token.
#[derive(Clone)]
pub struct HttpArchive {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl std::fmt::Debug for HttpArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpArchive")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpArchive {
    /// Creates an uploader for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidSource` if `endpoint` is not an absolute URL.
    pub fn new(
        client: reqwest::Client,
        endpoint: &str,
        token: Option<String>,
    ) -> Result<Self, PipelineError> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| PipelineError::InvalidSource(endpoint.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(PipelineError::InvalidSource(endpoint.to_string()));
        }
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// Upload URL for `key` in `bucket`.
    pub fn upload_url(&self, bucket: &str, key: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["upload", "storage", "v1", "b", bucket, "o"]);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("uploadType", "media")
            .append_pair("name", key);
        url
    }
}

impl BlobArchive for HttpArchive {
    async fn upload(&self, bucket: &str, source: &Path, key: &str) -> Result<(), PipelineError> {
        let upload_err = |reason: String| PipelineError::ArchiveUpload {
            path: source.to_path_buf(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason,
        };

        let body = tokio::fs::read(source)
            .await
            .map_err(|e| upload_err(e.to_string()))?;

        let mut request = self
            .client
            .post(self.upload_url(bucket, key))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| upload_err(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(upload_err(format!("HTTP {}", status)));
        }
        debug!("Uploaded {} as {}/{}", source.display(), bucket, key);
        Ok(())
    }
}
