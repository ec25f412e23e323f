// ─── Content Store ───
// Path-addressed cache under the game directory. Presence of a file is the
// only signal that it is complete.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use super::Downloader;
use crate::core::config::LauncherConfig;
use crate::core::error::{LauncherError, LauncherResult};

/// Sub-trees of the cache, each with its own key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreArea {
    /// `versions/`, keyed by `<id>/<id>.json` and `<id>/<id>.jar`.
    Versions,
    /// `libraries/`, keyed by the artifact's relative path.
    Libraries,
    /// `assets/indexes/`, keyed by `<asset index id>.json`.
    AssetIndexes,
    /// `assets/log_configs/`, keyed by the log config file id.
    LogConfigs,
}

/// A file known to be present in the store after an `ensure` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    /// `true` when this call downloaded the file.
    pub fetched: bool,
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    versions: PathBuf,
    libraries: PathBuf,
    asset_indexes: PathBuf,
    log_configs: PathBuf,
}

impl ContentStore {
    pub fn new(config: &LauncherConfig) -> Self {
        Self {
            versions: config.versions_dir(),
            libraries: config.libraries_dir(),
            asset_indexes: config.asset_indexes_dir(),
            log_configs: config.log_configs_dir(),
        }
    }

    pub fn area_dir(&self, area: StoreArea) -> &Path {
        match area {
            StoreArea::Versions => &self.versions,
            StoreArea::Libraries => &self.libraries,
            StoreArea::AssetIndexes => &self.asset_indexes,
            StoreArea::LogConfigs => &self.log_configs,
        }
    }

    /// Absolute location of `relative` inside `area`.
    ///
    /// Rejects keys that are absolute or climb out of the area with `..`.
    pub fn path(&self, area: StoreArea, relative: &str) -> LauncherResult<PathBuf> {
        let rel = Path::new(relative);
        let is_contained = !relative.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !is_contained {
            return Err(LauncherError::UnsafePath(relative.to_string()));
        }
        Ok(self.area_dir(area).join(rel))
    }

    /// Make sure `relative` exists in `area`, fetching it from `url` otherwise.
    pub async fn ensure(
        &self,
        downloader: &Downloader,
        area: StoreArea,
        relative: &str,
        url: &str,
    ) -> LauncherResult<StoredFile> {
        let path = self.path(area, relative)?;

        if path.exists() {
            debug!("Cached: {:?}", path);
            return Ok(StoredFile {
                path,
                fetched: false,
            });
        }

        let size = downloader.download_file(url, &path).await?;
        info!("Fetched {} ({} bytes)", relative, size);
        Ok(StoredFile {
            path,
            fetched: true,
        })
    }
}
