// ─── Launch Invocation ───
// Everything needed to start a materialized release, derived from the cache
// layout and the parsed descriptor.

use std::path::PathBuf;

use crate::core::auth::LaunchAccountProfile;
use crate::core::config::{LauncherConfig, Platform};
use crate::core::downloader::{ContentStore, StoreArea};
use crate::core::error::LauncherResult;
use crate::core::version::VersionJson;

use super::classpath::{build_classpath, build_library_path};

/// Fully resolved launch parameters for one release.
///
/// Paths are absolute. Nothing here is checked against the filesystem; a
/// missing file only shows up when the game fails to start.
#[derive(Debug, Clone)]
pub struct LaunchInvocation {
    pub release_id: String,
    pub main_class: String,
    pub library_paths: Vec<PathBuf>,
    pub client_jar: PathBuf,
    pub game_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub asset_index_id: String,
    pub log_config_path: Option<PathBuf>,
    pub natives_dir: PathBuf,
    pub account: LaunchAccountProfile,
}

impl LaunchInvocation {
    /// `-cp` value: library list followed by the client jar.
    pub fn classpath(&self, platform: Platform) -> String {
        build_classpath(platform, &self.library_paths, &self.client_jar)
    }
}

/// Build the invocation for `release_id` from an already parsed descriptor.
pub fn build_invocation(
    config: &LauncherConfig,
    release_id: &str,
    version: &VersionJson,
    account: LaunchAccountProfile,
) -> LauncherResult<LaunchInvocation> {
    let store = ContentStore::new(config);

    let log_config_path = match version.log_file() {
        Some(file) => Some(store.path(StoreArea::LogConfigs, &file.id)?),
        None => None,
    };

    Ok(LaunchInvocation {
        release_id: release_id.to_string(),
        main_class: version.main_class.clone(),
        library_paths: build_library_path(config, version)?,
        client_jar: config.client_jar_path(release_id),
        game_dir: config.game_dir().to_path_buf(),
        assets_dir: config.assets_dir(),
        asset_index_id: version.asset_index.id.clone(),
        log_config_path,
        natives_dir: config.natives_dir(release_id),
        account,
    })
}

/// Re-read the cached descriptor of `release_id`.
///
/// This is the refresh point for callers that only hold an id; the pipeline
/// itself passes the descriptor parsed during materialization.
pub async fn load_descriptor(
    config: &LauncherConfig,
    release_id: &str,
) -> LauncherResult<VersionJson> {
    VersionJson::load(&config.descriptor_path(release_id)).await
}

/// [`load_descriptor`] followed by [`build_invocation`].
pub async fn build_invocation_from_cache(
    config: &LauncherConfig,
    release_id: &str,
    account: LaunchAccountProfile,
) -> LauncherResult<LaunchInvocation> {
    let version = load_descriptor(config, release_id).await?;
    build_invocation(config, release_id, &version, account)
}
