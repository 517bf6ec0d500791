//! Acquisition of OpenAPI documents from local files or HTTP(S) URLs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use url::Url;

/// Upper bound for a remote fetch, connection included.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("OpenAPI document not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Timed out after {}s fetching {url}", timeout.as_secs())]
    Timeout { url: Url, timeout: Duration },
    #[error("Fetching {url} failed with HTTP {status}")]
    Http {
        url: Url,
        status: reqwest::StatusCode,
    },
    #[error("Request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("OpenAPI document from {origin} is empty")]
    EmptyPayload { origin: String },
}

/// Where an OpenAPI document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    File(PathBuf),
    Url(Url),
}

impl SpecSource {
    /// Interpret a command-line argument. Only `http` and `https` URLs are
    /// fetched; anything else is treated as a path.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::File(PathBuf::from(raw)),
        }
    }

    /// Materialize the document text.
    pub async fn acquire(&self) -> Result<String, SourceError> {
        let text = match self {
            Self::File(path) => read_file(path)?,
            Self::Url(url) => fetch(url, FETCH_TIMEOUT).await?,
        };
        if text.trim().is_empty() {
            return Err(SourceError::EmptyPayload {
                origin: self.to_string(),
            });
        }
        Ok(text)
    }
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

fn read_file(path: &Path) -> Result<String, SourceError> {
    debug!(path = %path.display(), "Reading OpenAPI document.");
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

async fn fetch(url: &Url, timeout: Duration) -> Result<String, SourceError> {
    let request_error = |source: reqwest::Error| {
        if source.is_timeout() {
            SourceError::Timeout {
                url: url.clone(),
                timeout,
            }
        } else {
            SourceError::Request {
                url: url.clone(),
                source,
            }
        }
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(request_error)?;

    debug!(%url, "Fetching OpenAPI document.");
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            url: url.clone(),
            status,
        });
    }

    response.text().await.map_err(request_error)
}
