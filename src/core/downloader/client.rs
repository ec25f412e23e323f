use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;

/// Transport seam between the pipeline and the network.
///
/// A fetch either yields the complete body or fails; nothing is streamed to
/// disk before the body is fully received.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> LauncherResult<Vec<u8>>;
}

/// `reqwest`-backed fetcher used by the binary.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> LauncherResult<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> LauncherResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Sequential downloader on top of a [`Fetch`] implementation.
pub struct Downloader {
    fetcher: Box<dyn Fetch>,
}

impl Downloader {
    pub fn new(fetcher: impl Fetch + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
        }
    }

    /// Downloader over a default HTTP client.
    pub fn http() -> LauncherResult<Self> {
        Ok(Self::new(HttpFetcher::new()?))
    }

    pub async fn fetch_bytes(&self, url: &str) -> LauncherResult<Vec<u8>> {
        self.fetcher.fetch(url).await
    }

    /// Fetch `url` and deserialize the body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> LauncherResult<T> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    // ── Single file download ────────────────────────────

    /// Download `url` to `dest`, creating parent directories as needed.
    ///
    /// The body is fully received before `dest` is created, so a transport
    /// failure never leaves a file behind.
    pub async fn download_file(&self, url: &str, dest: &Path) -> LauncherResult<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let bytes = self.fetch_bytes(url).await?;

        // Scope the handle so it is closed before the caller touches the file.
        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|e| LauncherError::io(dest, e))?;
            file.write_all(&bytes)
                .await
                .map_err(|e| LauncherError::io(dest, e))?;
            file.flush()
                .await
                .map_err(|e| LauncherError::io(dest, e))?;
        }

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(bytes.len() as u64)
    }
}
