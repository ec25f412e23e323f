// ─── Classpath Builder ───
// Derives the ordered library path list for a release from its descriptor.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::config::{LauncherConfig, Platform};
use crate::core::downloader::{ContentStore, StoreArea};
use crate::core::error::LauncherResult;
use crate::core::version::VersionJson;

/// Absolute paths of every library the release runs with, in descriptor order.
///
/// Each entry contributes the artifact picked by
/// [`LibraryEntry::resolve_artifact`](crate::core::version::LibraryEntry::resolve_artifact).
/// Entries resolving to a path already in the list are dropped, so the first
/// occurrence wins. Entries with no artifact for this platform are skipped.
pub fn build_library_path(
    config: &LauncherConfig,
    version: &VersionJson,
) -> LauncherResult<Vec<PathBuf>> {
    let store = ContentStore::new(config);
    let mut entries = Vec::new();

    for lib in &version.libraries {
        let Some(artifact) = lib.resolve_artifact(config.platform) else {
            warn!("Library {} has no artifact for {}", lib.label(), config.platform.os_name());
            continue;
        };
        entries.push(store.path(StoreArea::Libraries, &artifact.path)?);
    }

    let before = entries.len();
    dedup_preserving_order(&mut entries);
    if entries.len() != before {
        debug!("Dropped {} duplicate library path(s)", before - entries.len());
    }

    Ok(entries)
}

/// Join `libraries` and the client jar into a `-cp` value.
///
/// The client jar always goes last and is not checked against the library list.
pub fn build_classpath(platform: Platform, libraries: &[PathBuf], client_jar: &Path) -> String {
    libraries
        .iter()
        .map(|p| path_str(p))
        .chain(std::iter::once(path_str(client_jar)))
        .collect::<Vec<_>>()
        .join(platform.path_separator())
}

fn dedup_preserving_order(entries: &mut Vec<PathBuf>) {
    let mut seen = HashSet::new();
    entries.retain(|entry| seen.insert(entry.clone()));
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
