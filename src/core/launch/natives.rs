// ─── Native Extractor ───
// Unpacks platform shared libraries from native bundles into
// `bin/natives/<id>/`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::config::LauncherConfig;
use crate::core::downloader::{ContentStore, StoreArea};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::version::VersionJson;

/// Records which bundles populated a natives directory.
const STAMP_FILE: &str = ".natives.json";

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct NativesStamp {
    archives: Vec<String>,
}

/// Result of an [`extract_natives`] call.
#[derive(Debug, Clone)]
pub struct NativesOutcome {
    pub natives_dir: PathBuf,
    /// Native file names written by this call; empty when up to date.
    pub extracted: Vec<String>,
    pub up_to_date: bool,
}

/// Extract native libraries for `release_id` from the bundles `version` lists.
///
/// Extraction is skipped when the natives directory exists and its stamp names
/// exactly the bundles the descriptor currently lists. Otherwise the directory
/// is rebuilt from scratch and the stamp rewritten once every bundle succeeded.
pub async fn extract_natives(
    config: &LauncherConfig,
    release_id: &str,
    version: &VersionJson,
) -> LauncherResult<NativesOutcome> {
    let natives_dir = config.natives_dir(release_id);
    let store = ContentStore::new(config);
    let archives = version.native_archives(config.platform);
    let stamp = NativesStamp {
        archives: archives.iter().map(|a| a.path.clone()).collect(),
    };

    if natives_dir.exists() {
        if read_stamp(&natives_dir).await.as_ref() == Some(&stamp) {
            debug!("Natives for {} are up to date", release_id);
            return Ok(NativesOutcome {
                natives_dir,
                extracted: Vec::new(),
                up_to_date: true,
            });
        }

        info!("Native bundle set for {} changed, re-extracting", release_id);
        tokio::fs::remove_dir_all(&natives_dir)
            .await
            .map_err(|e| LauncherError::io(&natives_dir, e))?;
    }

    tokio::fs::create_dir_all(&natives_dir)
        .await
        .map_err(|e| LauncherError::io(&natives_dir, e))?;

    let suffixes = config.platform.native_suffixes();
    let mut extracted = Vec::new();

    for archive in archives {
        let archive_path = store.path(StoreArea::Libraries, &archive.path)?;
        if !archive_path.exists() {
            return Err(LauncherError::NativeArchiveMissing { path: archive_path });
        }

        let dest_dir = natives_dir.clone();
        let path_debug = archive_path.clone();
        let files = tokio::task::spawn_blocking(move || {
            extract_archive(&archive_path, &dest_dir, suffixes)
        })
        .await
        .map_err(|e| LauncherError::Other(format!("Task join error: {}", e)))??;

        info!(
            "Extracted {} native(s) from {:?} to {:?}",
            files.len(),
            path_debug,
            natives_dir
        );
        extracted.extend(files);
    }

    write_stamp(&natives_dir, &stamp).await?;

    Ok(NativesOutcome {
        natives_dir,
        extracted,
        up_to_date: false,
    })
}

/// Copy every member of `archive_path` whose name ends with one of `suffixes`
/// into `dest_dir`, flattened to its file name.
fn extract_archive(
    archive_path: &Path,
    dest_dir: &Path,
    suffixes: &[&str],
) -> LauncherResult<Vec<String>> {
    let file = std::fs::File::open(archive_path).map_err(|e| LauncherError::io(archive_path, e))?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let Some(name) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            warn!("Skipping unsafe archive entry {:?}", entry.name());
            continue;
        };
        if name.starts_with("META-INF") {
            continue;
        }
        let Some(file_name) = name.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !suffixes.iter().any(|suffix| file_name.ends_with(suffix)) {
            continue;
        }

        let dest = dest_dir.join(file_name);
        let mut out = std::fs::File::create(&dest).map_err(|e| LauncherError::io(&dest, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| LauncherError::io(&dest, e))?;
        debug!("Extracted native: {}", file_name);
        written.push(file_name.to_string());
    }

    Ok(written)
}

async fn read_stamp(natives_dir: &Path) -> Option<NativesStamp> {
    let raw = tokio::fs::read(natives_dir.join(STAMP_FILE)).await.ok()?;
    serde_json::from_slice(&raw).ok()
}

async fn write_stamp(natives_dir: &Path, stamp: &NativesStamp) -> LauncherResult<()> {
    let path = natives_dir.join(STAMP_FILE);
    let json = serde_json::to_vec_pretty(stamp)?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| LauncherError::io(path, e))
}
