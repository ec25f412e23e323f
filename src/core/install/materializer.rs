use tracing::{debug, info};

use crate::core::config::LauncherConfig;
use crate::core::downloader::{ContentStore, Downloader, StoreArea, StoredFile};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::launch::natives::{extract_natives, NativesOutcome};
use crate::core::version::{VersionEntry, VersionJson, VersionManifest};

/// A release whose files are all present in the content store.
#[derive(Debug, Clone)]
pub struct MaterializedRelease {
    pub id: String,
    /// Descriptor parsed once from the cached file.
    pub version: VersionJson,
    /// Number of files downloaded by this call.
    pub fetched: usize,
    pub natives: NativesOutcome,
}

/// Fills the content store for a release, one presence-gated fetch at a time.
///
/// Every step checks the store first, so calling [`materialize`] again after a
/// failure resumes where the previous call stopped.
///
/// [`materialize`]: Materializer::materialize
pub struct Materializer<'a> {
    config: &'a LauncherConfig,
    downloader: &'a Downloader,
    store: ContentStore,
}

impl<'a> Materializer<'a> {
    pub fn new(config: &'a LauncherConfig, downloader: &'a Downloader) -> Self {
        Self {
            config,
            downloader,
            store: ContentStore::new(config),
        }
    }

    /// Fetch the release manifest from the configured URL.
    pub async fn list_releases(&self) -> LauncherResult<VersionManifest> {
        VersionManifest::fetch(self.downloader, &self.config.manifest_url).await
    }

    /// Look `release_id` up in a freshly fetched manifest.
    pub async fn resolve(&self, release_id: &str) -> LauncherResult<VersionEntry> {
        let manifest = self.list_releases().await?;
        manifest.resolve(release_id).cloned()
    }

    /// [`resolve`](Self::resolve) followed by [`materialize`](Self::materialize).
    pub async fn install(&self, release_id: &str) -> LauncherResult<MaterializedRelease> {
        let release = self.resolve(release_id).await?;
        self.materialize(&release).await
    }

    pub async fn materialize(&self, release: &VersionEntry) -> LauncherResult<MaterializedRelease> {
        let id = release.id.as_str();
        let platform = self.config.platform;
        let mut fetched = 0usize;
        let mut count = |file: StoredFile| {
            if file.fetched {
                fetched += 1;
            }
            file
        };

        info!("Materializing {} for {}", id, platform.os_name());

        // 1. Version directory
        let version_dir = self.store.path(StoreArea::Versions, id)?;
        if !version_dir.is_dir() {
            tokio::fs::create_dir_all(&version_dir)
                .await
                .map_err(|e| LauncherError::io(&version_dir, e))?;
            debug!("Created version directory {:?}", version_dir);
        }

        // 2. Descriptor, stored verbatim
        let descriptor = count(
            self.store
                .ensure(
                    self.downloader,
                    StoreArea::Versions,
                    &format!("{id}/{id}.json"),
                    &release.url,
                )
                .await?,
        );
        let version = VersionJson::load(&descriptor.path).await?;

        // 3. Client jar
        count(
            self.store
                .ensure(
                    self.downloader,
                    StoreArea::Versions,
                    &format!("{id}/{id}.jar"),
                    &version.downloads.client.url,
                )
                .await?,
        );

        // 4. Libraries: common artifact and platform variant
        for lib in &version.libraries {
            let artifacts = lib.artifacts_to_fetch(platform);
            if artifacts.is_empty() {
                debug!("Library {} has nothing to fetch", lib.label());
            }
            for artifact in artifacts {
                count(
                    self.store
                        .ensure(
                            self.downloader,
                            StoreArea::Libraries,
                            &artifact.path,
                            &artifact.url,
                        )
                        .await?,
                );
            }
        }

        // 5. Log configuration
        match version.log_file() {
            Some(file) => {
                count(
                    self.store
                        .ensure(self.downloader, StoreArea::LogConfigs, &file.id, &file.url)
                        .await?,
                );
            }
            None => debug!("Release {} ships no log configuration", id),
        }

        // 6. Asset index
        count(
            self.store
                .ensure(
                    self.downloader,
                    StoreArea::AssetIndexes,
                    &format!("{}.json", version.asset_index.id),
                    &version.asset_index.url,
                )
                .await?,
        );

        // 7. Natives
        let natives = extract_natives(self.config, id, &version).await?;

        info!(
            "Release {} ready ({} file(s) fetched, {} libraries)",
            id,
            fetched,
            version.libraries.len()
        );

        Ok(MaterializedRelease {
            id: id.to_string(),
            version,
            fetched,
            natives,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::config::Platform;
    use crate::core::testing::{zip_bytes, MockFetcher};

    const MANIFEST_URL: &str = "http://meta.local/version_manifest.json";
    const DESCRIPTOR_URL: &str = "http://meta.local/X.json";

    fn descriptor() -> serde_json::Value {
        serde_json::json!({
            "id": "X",
            "mainClass": "M",
            "assetIndex": {"id": "1.12", "url": "http://meta.local/indexes/1.12.json"},
            "logging": {"client": {"file": {"id": "client-1.12.xml", "url": "http://meta.local/client-1.12.xml"}}},
            "downloads": {"client": {"url": "http://meta.local/client.jar"}},
            "libraries": [
                {"downloads": {"artifact": {"path": "a/a.jar", "url": "http://libs.local/a.jar"}}},
                {"downloads": {
                    "artifact": {"path": "lwjgl/lwjgl.jar", "url": "http://libs.local/lwjgl.jar"},
                    "classifiers": {
                        "natives-linux": {"path": "lwjgl/natives-linux.jar", "url": "http://libs.local/natives-linux.jar"},
                        "natives-windows": {"path": "lwjgl/natives-windows.jar", "url": "http://libs.local/natives-windows.jar"}
                    }
                }},
                {"downloads": {"artifact": {"path": "c/c.jar", "url": "http://libs.local/c.jar"}}},
                {"name": "legacy:entry:1"}
            ]
        })
    }

    fn fetcher() -> MockFetcher {
        MockFetcher::new()
            .with(
                MANIFEST_URL,
                serde_json::json!({"versions": [
                    {"id": "Y", "url": "http://meta.local/Y.json"},
                    {"id": "X", "url": DESCRIPTOR_URL}
                ]})
                .to_string(),
            )
            .with(DESCRIPTOR_URL, descriptor().to_string())
            .with("http://meta.local/client.jar", b"client")
            .with("http://meta.local/indexes/1.12.json", b"{\"objects\":{}}")
            .with("http://meta.local/client-1.12.xml", b"<Configuration/>")
            .with("http://libs.local/a.jar", b"a")
            .with("http://libs.local/lwjgl.jar", b"lwjgl")
            .with(
                "http://libs.local/natives-linux.jar",
                zip_bytes(&[("liblwjgl.so", b"so"), ("README.txt", b"txt")]),
            )
            .with("http://libs.local/c.jar", b"c")
    }

    fn config(dir: &Path) -> LauncherConfig {
        LauncherConfig::new(dir)
            .unwrap()
            .with_platform(Platform::Linux)
            .with_manifest_url(MANIFEST_URL)
    }

    fn entry() -> VersionEntry {
        VersionEntry {
            id: "X".into(),
            url: DESCRIPTOR_URL.into(),
        }
    }

    #[tokio::test]
    async fn materialize_populates_every_area() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        let fetcher = fetcher();
        let downloader = Downloader::new(fetcher.clone());

        let release = Materializer::new(&config, &downloader)
            .materialize(&entry())
            .await
            .unwrap();

        let root = temp.path();
        assert_eq!(
            std::fs::read_to_string(root.join("versions/X/X.json")).unwrap(),
            descriptor().to_string()
        );
        assert_eq!(std::fs::read(root.join("versions/X/X.jar")).unwrap(), b"client");
        assert!(root.join("libraries/a/a.jar").exists());
        assert!(root.join("libraries/lwjgl/lwjgl.jar").exists());
        assert!(root.join("libraries/lwjgl/natives-linux.jar").exists());
        assert!(!root.join("libraries/lwjgl/natives-windows.jar").exists());
        assert!(root.join("libraries/c/c.jar").exists());
        assert!(root.join("assets/log_configs/client-1.12.xml").exists());
        assert!(root.join("assets/indexes/1.12.json").exists());
        assert!(root.join("bin/natives/X/liblwjgl.so").exists());
        assert!(!root.join("bin/natives/X/README.txt").exists());

        assert_eq!(release.fetched, 8);
        assert_eq!(release.version.main_class, "M");
        assert_eq!(release.natives.extracted, ["liblwjgl.so"]);
        assert!(!fetcher.calls().contains(&MANIFEST_URL.to_string()));
    }

    #[tokio::test]
    async fn second_materialize_performs_no_fetches() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        let fetcher = fetcher();
        let downloader = Downloader::new(fetcher.clone());
        let materializer = Materializer::new(&config, &downloader);

        materializer.materialize(&entry()).await.unwrap();
        fetcher.reset_calls();
        let again = materializer.materialize(&entry()).await.unwrap();

        assert!(fetcher.calls().is_empty());
        assert_eq!(again.fetched, 0);
        assert!(again.natives.up_to_date);
    }

    #[tokio::test]
    async fn failed_library_fetch_resumes_without_refetching() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        let fetcher = fetcher();
        fetcher.fail("http://libs.local/lwjgl.jar");
        let downloader = Downloader::new(fetcher.clone());
        let materializer = Materializer::new(&config, &downloader);

        let err = materializer.materialize(&entry()).await.unwrap_err();
        assert!(matches!(err, LauncherError::DownloadFailed { status: 500, .. }));
        assert!(temp.path().join("libraries/a/a.jar").exists());
        assert!(!temp.path().join("libraries/lwjgl/lwjgl.jar").exists());
        assert!(!temp.path().join("libraries/c/c.jar").exists());

        fetcher.heal("http://libs.local/lwjgl.jar");
        fetcher.reset_calls();
        materializer.materialize(&entry()).await.unwrap();

        let calls = fetcher.calls();
        assert_eq!(
            calls,
            [
                "http://libs.local/lwjgl.jar",
                "http://libs.local/natives-linux.jar",
                "http://libs.local/c.jar",
                "http://meta.local/client-1.12.xml",
                "http://meta.local/indexes/1.12.json",
            ]
        );
    }

    #[tokio::test]
    async fn cached_descriptor_is_not_refetched() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        let path = config.descriptor_path("X");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut cached = descriptor();
        cached["mainClass"] = "Cached".into();
        std::fs::write(&path, cached.to_string()).unwrap();

        let fetcher = fetcher();
        let downloader = Downloader::new(fetcher.clone());
        let release = Materializer::new(&config, &downloader)
            .materialize(&entry())
            .await
            .unwrap();

        assert_eq!(release.version.main_class, "Cached");
        assert!(!fetcher.calls().contains(&DESCRIPTOR_URL.to_string()));
    }

    #[tokio::test]
    async fn install_resolves_through_manifest() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        let fetcher = fetcher();
        let downloader = Downloader::new(fetcher.clone());

        let release = Materializer::new(&config, &downloader)
            .install("X")
            .await
            .unwrap();

        assert_eq!(release.id, "X");
        assert_eq!(fetcher.calls()[0], MANIFEST_URL);
        assert_eq!(fetcher.calls()[1], DESCRIPTOR_URL);
    }

    #[tokio::test]
    async fn unknown_release_aborts_before_touching_the_cache() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        let fetcher = fetcher();
        let downloader = Downloader::new(fetcher.clone());

        let err = Materializer::new(&config, &downloader)
            .install("Z")
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::VersionNotFound(ref id) if id == "Z"));
        assert_eq!(fetcher.calls(), [MANIFEST_URL]);
        assert!(!temp.path().join("versions").exists());
    }

    #[tokio::test]
    async fn malformed_descriptor_is_a_parse_error_and_stays_cached() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        let fetcher = MockFetcher::new().with(DESCRIPTOR_URL, b"{\"truncated\": ");
        let downloader = Downloader::new(fetcher);

        let err = Materializer::new(&config, &downloader)
            .materialize(&entry())
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::Json(_)));
        assert!(config.descriptor_path("X").exists());
    }
}
