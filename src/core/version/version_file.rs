// ─── Version File ───
// Parses a release descriptor and picks the artifacts that apply to a platform.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::config::Platform;
use crate::core::error::{LauncherError, LauncherResult};

/// A fully parsed release descriptor (`versions/<id>/<id>.json`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    #[serde(default)]
    pub id: Option<String>,
    pub main_class: String,
    pub asset_index: AssetIndexInfo,
    /// Absent on very old releases.
    #[serde(default)]
    pub logging: Option<LoggingInfo>,
    pub downloads: VersionDownloads,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingInfo {
    pub client: ClientLogging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientLogging {
    pub file: LogFileInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogFileInfo {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionDownloads {
    pub client: DownloadArtifact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub url: String,
}

// ─── Library Entry ───

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibDownloadArtifact>,
    #[serde(default)]
    pub classifiers: HashMap<String, LibDownloadArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibDownloadArtifact {
    /// Location relative to `libraries/`.
    pub path: String,
    pub url: String,
}

impl LibraryEntry {
    /// Human-readable label for logs.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed library>")
    }

    /// Platform-independent artifact (`downloads.artifact`).
    pub fn common_artifact(&self) -> Option<&LibDownloadArtifact> {
        self.downloads.as_ref()?.artifact.as_ref()
    }

    /// Native bundle for `platform` (`downloads.classifiers["natives-<os>"]`).
    pub fn platform_variant(&self, platform: Platform) -> Option<&LibDownloadArtifact> {
        self.downloads
            .as_ref()?
            .classifiers
            .get(&platform.classifier_key())
    }

    /// Every artifact of this entry that must be present in the cache:
    /// the common artifact first, then the platform variant.
    pub fn artifacts_to_fetch(&self, platform: Platform) -> Vec<&LibDownloadArtifact> {
        self.common_artifact()
            .into_iter()
            .chain(self.platform_variant(platform))
            .collect()
    }

    /// The single artifact this entry contributes to the library path.
    ///
    /// The platform variant takes precedence over the common artifact;
    /// `None` for entries that carry neither.
    pub fn resolve_artifact(&self, platform: Platform) -> Option<&LibDownloadArtifact> {
        self.platform_variant(platform)
            .or_else(|| self.common_artifact())
    }
}

impl VersionJson {
    pub fn parse(raw: &[u8]) -> LauncherResult<Self> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Re-read a descriptor previously written to the cache.
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        Self::parse(&raw)
    }

    /// Client log configuration file, if the release ships one.
    pub fn log_file(&self) -> Option<&LogFileInfo> {
        self.logging.as_ref().map(|l| &l.client.file)
    }

    /// Native bundles that apply to `platform`, in descriptor order.
    pub fn native_archives(&self, platform: Platform) -> Vec<&LibDownloadArtifact> {
        self.libraries
            .iter()
            .filter_map(|lib| lib.platform_variant(platform))
            .collect()
    }
}
