// ─── Version Manifest ───
// Handles fetching and parsing the top-level release index.

use serde::Deserialize;
use tracing::info;

use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};

/// Top-level version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    /// Location of this release's descriptor.
    pub url: String,
}

impl VersionManifest {
    /// Fetch the manifest from `url`.
    pub async fn fetch(downloader: &Downloader, url: &str) -> LauncherResult<Self> {
        info!("Fetching version manifest...");

        let manifest: VersionManifest = downloader.fetch_json(url).await?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.12.2").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Like [`find_version`](Self::find_version), but an unknown id is an error.
    pub fn resolve(&self, id: &str) -> LauncherResult<&VersionEntry> {
        self.find_version(id)
            .ok_or_else(|| LauncherError::VersionNotFound(id.to_string()))
    }
}
