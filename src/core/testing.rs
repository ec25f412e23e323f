use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::downloader::Fetch;
use crate::core::error::{LauncherError, LauncherResult};

#[derive(Default)]
struct Inner {
    bodies: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    calls: Vec<String>,
}

/// In-memory [`Fetch`] double that records every requested URL.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// `Downloader`. Unknown URLs answer 404, URLs marked with [`fail`] answer 500.
///
/// [`fail`]: MockFetcher::fail
#[derive(Clone, Default)]
pub struct MockFetcher {
    inner: Arc<Mutex<Inner>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, body: impl AsRef<[u8]>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .bodies
            .insert(url.to_string(), body.as_ref().to_vec());
        self
    }

    pub fn fail(&self, url: &str) {
        self.inner.lock().unwrap().failing.insert(url.to_string());
    }

    pub fn heal(&self, url: &str) {
        self.inner.lock().unwrap().failing.remove(url);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn reset_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl Fetch for MockFetcher {
    async fn fetch(&self, url: &str) -> LauncherResult<Vec<u8>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(url.to_string());

        if inner.failing.contains(url) {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: 500,
            });
        }

        inner
            .bodies
            .get(url)
            .cloned()
            .ok_or_else(|| LauncherError::DownloadFailed {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Write a zip archive at `path` holding `entries` as `(name, contents)`.
pub fn write_zip(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, contents) in entries {
        zip.start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap();
}

/// In-memory zip archive holding `entries`.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;

    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, contents) in entries {
        zip.start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap().into_inner()
}
