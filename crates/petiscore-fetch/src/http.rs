//! HTTP client for pulling petition documents from the file store.

use std::path::Path;

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Plain GET client for document URLs.
///
/// A non-2xx response is an error for that document only; the caller decides
/// whether to continue with the next record.
pub struct FetchClient {
    client: reqwest::Client,
}

impl FetchClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Download `url` and return the body bytes.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }

    /// Download `url` straight to `path`.
    pub async fn download_to(&self, url: &str, path: &Path) -> Result<(), FetchError> {
        let bytes = self.download(url).await?;
        std::fs::write(path, &bytes)?;
        info!(url = %url, bytes = bytes.len(), path = %path.display(), "downloaded document");
        Ok(())
    }
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}
