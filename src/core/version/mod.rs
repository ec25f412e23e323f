pub mod manifest;
pub mod version_file;

pub use manifest::{VersionEntry, VersionManifest};
pub use version_file::{
    AssetIndexInfo, DownloadArtifact, LibDownloadArtifact, LibraryDownloads, LibraryEntry,
    LogFileInfo, VersionDownloads, VersionJson,
};
