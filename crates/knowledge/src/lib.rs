//! Knowledge document fetching.
//!
//! The assistant answers from a single markdown/plain-text document that is
//! downloaded once at startup and embedded into every system prompt. The
//! document usually lives on Google Drive, whose share links point at an HTML
//! viewer; those are rewritten to the direct-download form first.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const DRIVE_HOST: &str = "drive.google.com";
const DRIVE_FILE_SEGMENT: &str = "/file/d/";
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Immutable knowledge text, cheap to clone and share across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeText(Arc<str>);

impl KnowledgeText {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KnowledgeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KnowledgeText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Rewrite a Google Drive share link into its direct-download URL.
///
/// `https://drive.google.com/file/d/<ID>/view?usp=sharing` becomes
/// `https://drive.google.com/uc?export=download&id=<ID>`. Any other URL is
/// returned unchanged.
pub fn resolve_download_url(url: &str) -> Result<String, KnowledgeError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(KnowledgeError::EmptyUrl);
    }

    if !url.contains(DRIVE_HOST) {
        return Ok(url.to_string());
    }

    let Some((_, after)) = url.split_once(DRIVE_FILE_SEGMENT) else {
        return Ok(url.to_string());
    };

    let file_id = after
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    if file_id.is_empty() {
        return Err(KnowledgeError::InvalidShareLink(url.to_string()));
    }

    Ok(format!("https://{DRIVE_HOST}/uc?export=download&id={file_id}"))
}

/// Downloads the knowledge document over HTTP.
pub struct KnowledgeFetcher {
    client: reqwest::Client,
}

impl KnowledgeFetcher {
    pub fn new() -> Result<Self, KnowledgeError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| KnowledgeError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Fetch the document text. A non-success status is an error; there is
    /// no retry.
    pub async fn fetch(&self, url: &str) -> Result<KnowledgeText, KnowledgeError> {
        let download_url = resolve_download_url(url)?;
        debug!(url = %download_url, "Fetching knowledge document");

        let response = self
            .client
            .get(&download_url)
            .send()
            .await
            .map_err(|e| KnowledgeError::Request {
                url: download_url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(KnowledgeError::Status {
                url: download_url,
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| KnowledgeError::Request {
            url: download_url.clone(),
            reason: e.to_string(),
        })?;

        info!(bytes = text.len(), "Knowledge document loaded");
        Ok(KnowledgeText::new(text))
    }
}

/// Knowledge fetch errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Knowledge document URL is empty")]
    EmptyUrl,

    #[error("Share link has no file identifier: {0}")]
    InvalidShareLink(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Failed to fetch knowledge document from {url}: {reason}")]
    Request { url: String, reason: String },

    #[error("Knowledge document request to {url} returned status {status}")]
    Status { url: String, status: u16 },
}
